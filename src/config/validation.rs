//! Configuration validation
//!
//! Every section checks its own invariants; the aggregate prefixes the
//! failing section's name to the message.

mod pipeline_validators;


/// Checks a configuration section before it is used
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
