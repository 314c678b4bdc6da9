use thiserror::Error;

/// Why a greeting could not be produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GreetingError {
    #[error("empty name")]
    EmptyInput,
}

/// Returns a greeting for the named person.
///
/// Only the empty string is rejected; whitespace is a valid name.
pub fn hello(name: &str) -> Result<String, GreetingError> {
    if name.is_empty() {
        return Err(GreetingError::EmptyInput);
    }
    Ok(format!("Hi, {name}. Welcome!"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greets_by_name() {
        assert_eq!(hello("Alice").unwrap(), "Hi, Alice. Welcome!");
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(hello(""), Err(GreetingError::EmptyInput));
        assert_eq!(GreetingError::EmptyInput.to_string(), "empty name");
    }

    #[test]
    fn whitespace_is_a_name() {
        assert_eq!(hello(" ").unwrap(), "Hi,  . Welcome!");
    }
}
