//! Operator selection of the certificate to enroll

/// What the operator answered at the selection prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// 0-based index into the chain
    Index(usize),
    /// Operator chose not to enroll anything
    Quit,
    /// Answer could not be used; nothing is enrolled
    Invalid { reason: String },
}

/// Interpret the operator's answer for a chain of `chain_len` certificates.
///
/// An empty answer or exhausted input selects the leaf. Numbers are 1-based.
pub fn parse_selection(answer: Option<&str>, chain_len: usize) -> Selection {
    if chain_len == 0 {
        return Selection::Invalid {
            reason: "no certificates to choose from".to_string(),
        };
    }

    let answer = answer.map(str::trim).unwrap_or("");
    if answer.is_empty() {
        return Selection::Index(0);
    }
    if answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit") {
        return Selection::Quit;
    }

    match answer.parse::<usize>() {
        Ok(n) if (1..=chain_len).contains(&n) => Selection::Index(n - 1),
        Ok(n) => Selection::Invalid {
            reason: format!("{} is not between 1 and {}", n, chain_len),
        },
        Err(_) => Selection::Invalid {
            reason: format!("'{}' is not a certificate number", answer),
        },
    }
}
