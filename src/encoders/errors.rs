use std::fmt;

/// Errors raised by name lookups and registry bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Encode was asked for a name no active table knows about
    NotAColumnName {
        name: String,
        suggestion: Option<String>,
    },
    /// Decode was asked for something that is not a synthetic identifier
    NotAnEncodedName { name: String },
    /// Auxiliary tables survived the destruction of the primary table
    InconsistentRegistry { remaining: usize },
}

impl EncodeError {
    /// Create a NotAColumnName error, suggesting the closest known name
    pub fn not_a_column_name(name: &str, known: &[String]) -> Self {
        EncodeError::NotAColumnName {
            name: name.to_string(),
            suggestion: find_closest_name(name, known),
        }
    }

    pub fn not_an_encoded_name(name: &str) -> Self {
        EncodeError::NotAnEncodedName {
            name: name.to_string(),
        }
    }
}

fn truncate_for_display(input: &str) -> String {
    if input.chars().count() > 60 {
        let head: String = input.chars().take(60).collect();
        format!("{}...", head)
    } else {
        input.to_string()
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let use_color = should_use_color();
        let (error, hint) = if use_color {
            ("\x1b[1;31merror:\x1b[0m", "\x1b[1;36mhint:\x1b[0m")
        } else {
            ("error:", "hint:")
        };

        match self {
            EncodeError::NotAColumnName { name, suggestion } => {
                write!(
                    f,
                    "{} trying to encode '{}' but it is not a column name",
                    error,
                    truncate_for_display(name)
                )?;
                if let Some(suggestion) = suggestion {
                    write!(f, "\n\n{} did you mean '{}'?", hint, suggestion)?;
                }
                Ok(())
            }
            EncodeError::NotAnEncodedName { name } => {
                write!(
                    f,
                    "{} trying to decode '{}' but it is not an encoded column name",
                    error,
                    truncate_for_display(name)
                )
            }
            EncodeError::InconsistentRegistry { remaining } => {
                writeln!(
                    f,
                    "{} {} auxiliary encoder(s) still alive after removing the primary encoder",
                    error, remaining
                )?;
                write!(
                    f,
                    "\n{} an auxiliary encoder outlived the call that created it",
                    hint
                )
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Check if colored output should be used
pub fn should_use_color() -> bool {
    // Respect NO_COLOR environment variable
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row = vec![0; len2 + 1];

    for (i, c1) in s1.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, c2) in s2.chars().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len2]
}

/// Find the closest matching column name
pub fn find_closest_name(name: &str, available: &[String]) -> Option<String> {
    if available.is_empty() || name.is_empty() {
        return None;
    }

    let threshold = if name.chars().count() < 5 { 1 } else { 2 };
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for candidate in available {
        let distance = levenshtein_distance(name, candidate);
        if distance < best_distance && distance <= threshold {
            best_distance = distance;
            best_match = Some(candidate.clone());
        }
    }

    best_match
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("weight", "weight"), 0);
        assert_eq!(levenshtein_distance("weight", "height"), 1);
        assert_eq!(levenshtein_distance("", "age"), 3);
    }

    #[test]
    fn test_find_closest_name() {
        let names = vec![
            "weight".to_string(),
            "height".to_string(),
            "age".to_string(),
        ];

        assert_eq!(
            find_closest_name("wieght", &names),
            Some("weight".to_string())
        );
        assert_eq!(find_closest_name("ag", &names), Some("age".to_string()));
        assert_eq!(find_closest_name("income", &names), None);
        assert_eq!(find_closest_name("", &names), None);
    }

    #[test]
    fn test_error_display_no_color() {
        // Unsafe: environment variable access (not thread-safe)
        unsafe {
            std::env::set_var("NO_COLOR", "1");
        }

        let err = EncodeError::not_a_column_name("wieght", &["weight".to_string()]);
        let display = format!("{}", err);
        assert!(display.contains("'wieght' but it is not a column name"));
        assert!(display.contains("did you mean 'weight'?"));

        let err = EncodeError::not_an_encoded_name("Column_9_Encoded");
        assert!(format!("{}", err).contains("not an encoded column name"));

        let err = EncodeError::InconsistentRegistry { remaining: 2 };
        assert!(format!("{}", err).contains("2 auxiliary encoder(s)"));

        // Unsafe: environment variable access (not thread-safe)
        unsafe {
            std::env::remove_var("NO_COLOR");
        }
    }

    #[test]
    fn test_long_names_are_truncated_only_in_display() {
        let long = "x".repeat(100);
        let err = EncodeError::not_an_encoded_name(&long);

        match &err {
            EncodeError::NotAnEncodedName { name } => assert_eq!(name, &long),
            other => panic!("unexpected error: {:?}", other),
        }

        let display = err.to_string();
        assert!(display.contains(&format!("'{}...'", "x".repeat(60))));
        assert!(!display.contains(&long));
    }
}
