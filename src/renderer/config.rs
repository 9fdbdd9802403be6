//! Configuration for Go output

/// Configuration options for generated Go code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoConfig {
    /// Tool name used in the `Code generated by` header
    pub generator_name: String,

    /// Receiver identifier of the generated methods
    pub receiver: String,
}

impl Default for GoConfig {
    fn default() -> Self {
        Self {
            generator_name: "enumr".to_string(),
            receiver: "t".to_string(),
        }
    }
}

impl GoConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the generator name written in the header
    pub fn with_generator_name(mut self, name: impl Into<String>) -> Self {
        self.generator_name = name.into();
        self
    }

    /// Set the method receiver name
    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = receiver.into();
        self
    }

    /// The header line marking the file as generated
    pub fn header(&self) -> String {
        format!("// Code generated by {}. DO NOT EDIT.", self.generator_name)
    }
}
