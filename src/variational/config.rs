//! Variational backend configuration.

/// Number of qubits (feature dimension) of the evaluated circuit.
pub const NUM_QUBITS: usize = 2;

/// Parameter keys read from an object-valued `parameters`.
pub const FEATURE_KEYS: [&str; NUM_QUBITS] = ["x", "y"];

/// Configuration for the variational backend.
///
/// # Examples
///
/// ```
/// use optiroute::variational::VariationalConfig;
///
/// let config = VariationalConfig::default().with_default_features([0.25, 0.75]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct VariationalConfig {
    /// Feature values used for keys missing from an object input.
    pub default_features: [f64; NUM_QUBITS],

    /// Features used when `parameters` is neither an object nor an array.
    pub fallback_features: [f64; NUM_QUBITS],

    /// Random seed for standalone evaluation.
    pub seed: Option<u64>,
}

impl Default for VariationalConfig {
    fn default() -> Self {
        Self {
            default_features: [0.5, 0.5],
            fallback_features: [0.1, 0.2],
            seed: None,
        }
    }
}

impl VariationalConfig {
    pub fn with_default_features(mut self, features: [f64; NUM_QUBITS]) -> Self {
        self.default_features = features;
        self
    }

    pub fn with_fallback_features(mut self, features: [f64; NUM_QUBITS]) -> Self {
        self.fallback_features = features;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self
            .default_features
            .iter()
            .chain(&self.fallback_features)
            .any(|x| !x.is_finite())
        {
            return Err("feature defaults must be finite".into());
        }
        Ok(())
    }
}
