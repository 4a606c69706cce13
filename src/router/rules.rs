//! Keyword routing rules and the rule-ordered classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Downstream tools an intent can be routed to.
///
/// Only [`Tool::QuantumOptimize`] is served by this crate; the rest are
/// handled by external collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    DeepResearch,
    QuantumOptimize,
    CryptoService,
    DefaultLlm,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::DeepResearch => "deep_research",
            Tool::QuantumOptimize => "quantum_optimize",
            Tool::CryptoService => "crypto_service",
            Tool::DefaultLlm => "default_llm",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deep_research" => Ok(Tool::DeepResearch),
            "quantum_optimize" => Ok(Tool::QuantumOptimize),
            "crypto_service" => Ok(Tool::CryptoService),
            "default_llm" => Ok(Tool::DefaultLlm),
            other => Err(format!("unknown tool `{other}`")),
        }
    }
}

/// A keyword rule. Fires when any keyword occurs in the lowercased intent.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingRule {
    pub keywords: Vec<String>,
    pub tool: Tool,
    pub confidence: f64,
    pub reasoning: String,
}

impl RoutingRule {
    pub fn new(keywords: &[&str], tool: Tool, confidence: f64, reasoning: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            tool,
            confidence,
            reasoning: reasoning.to_string(),
        }
    }

    /// Whether any keyword is a substring of `lowered`.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// The classifier's verdict for one intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Tool identifier, e.g. `quantum_optimize`.
    pub tool: String,
    /// Heuristic score. May exceed 1.0 (see [`BackendRouter::classify`]).
    pub confidence: f64,
    /// Which rule fired.
    pub reasoning: String,
}

impl RoutingDecision {
    /// The tool as a known variant, if it is one.
    pub fn known_tool(&self) -> Option<Tool> {
        self.tool.parse().ok()
    }

    pub fn routes_to(&self, tool: Tool) -> bool {
        self.known_tool() == Some(tool)
    }
}

/// Ordered keyword classifier. The first matching rule wins.
///
/// # Examples
///
/// ```
/// use optiroute::router::{BackendRouter, Tool};
///
/// let router = BackendRouter::default();
/// let decision = router.classify("optimize my portfolio");
/// assert!(decision.routes_to(Tool::QuantumOptimize));
/// ```
#[derive(Debug, Clone)]
pub struct BackendRouter {
    rules: Vec<RoutingRule>,
    fallback: RoutingRule,
    long_intent_chars: usize,
    long_intent_bonus: f64,
}

impl BackendRouter {
    /// A router with no rules; everything goes to the fallback.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            fallback: RoutingRule::new(&[], Tool::DefaultLlm, 0.5, "Default routing"),
            long_intent_chars: 20,
            long_intent_bonus: 0.01,
        }
    }

    /// Appends a rule. Earlier rules take precedence.
    pub fn with_rule(mut self, rule: RoutingRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_fallback(mut self, tool: Tool, confidence: f64, reasoning: &str) -> Self {
        self.fallback = RoutingRule::new(&[], tool, confidence, reasoning);
        self
    }

    /// Intents longer than `chars` characters get `bonus` added.
    pub fn with_long_intent_bonus(mut self, chars: usize, bonus: f64) -> Self {
        self.long_intent_chars = chars;
        self.long_intent_bonus = bonus;
        self
    }

    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    /// Classifies an intent.
    ///
    /// Matching is case-insensitive substring search against each rule in
    /// order. Intents longer than 20 characters receive +0.01 confidence,
    /// applied after the match and not clamped, so a 0.98 rule can report
    /// 0.99 and a custom 1.0 rule can report more than 1.
    pub fn classify(&self, intent: &str) -> RoutingDecision {
        let lowered = intent.to_lowercase();
        let rule = self
            .rules
            .iter()
            .find(|r| r.matches(&lowered))
            .unwrap_or(&self.fallback);

        let mut confidence = rule.confidence;
        if intent.chars().count() > self.long_intent_chars {
            confidence += self.long_intent_bonus;
        }

        RoutingDecision {
            tool: rule.tool.as_str().to_string(),
            confidence,
            reasoning: rule.reasoning.clone(),
        }
    }
}

impl Default for BackendRouter {
    /// The standard table: research, then quantum, then crypto.
    fn default() -> Self {
        Self::empty()
            .with_rule(RoutingRule::new(
                &["research", "search"],
                Tool::DeepResearch,
                0.95,
                "Keyword 'research' detected.",
            ))
            .with_rule(RoutingRule::new(
                &["quantum", "optimize"],
                Tool::QuantumOptimize,
                0.98,
                "Keywords for quantum optimization detected.",
            ))
            .with_rule(RoutingRule::new(
                &["sign", "encrypt"],
                Tool::CryptoService,
                0.90,
                "Cryptographic intent detected.",
            ))
    }
}
