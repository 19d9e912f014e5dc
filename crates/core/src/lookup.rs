//! Outcome of a remote existence check and the policy that interprets it.
//!
//! Remote lookups distinguish "the service says it does not exist" from
//! "we could not find out". The orchestrator decides what to do with the
//! second case through an [`ExistencePolicy`].

/// Result of looking up a referent in a remote directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The service returned the record.
    Found(T),
    /// The service confirmed that no such record exists.
    Absent,
    /// The service could not be asked or gave an unusable answer.
    Indeterminate(String),
}

/// How an indeterminate lookup is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistencePolicy {
    /// Treat an indeterminate lookup as absent.
    #[default]
    FailClosed,
    /// Treat an indeterminate lookup as present.
    FailOpen,
}

impl ExistencePolicy {
    /// Whether the referent should be considered to exist.
    pub fn admits<T>(self, lookup: &Lookup<T>) -> bool {
        match lookup {
            Lookup::Found(_) => true,
            Lookup::Absent => false,
            Lookup::Indeterminate(_) => self == ExistencePolicy::FailOpen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn found_is_always_admitted() {
        let lookup = Lookup::Found(());
        assert!(ExistencePolicy::FailClosed.admits(&lookup));
        assert!(ExistencePolicy::FailOpen.admits(&lookup));
    }

    #[test]
    fn absent_is_never_admitted() {
        let lookup: Lookup<()> = Lookup::Absent;
        assert!(!ExistencePolicy::FailClosed.admits(&lookup));
        assert!(!ExistencePolicy::FailOpen.admits(&lookup));
    }

    #[test]
    fn indeterminate_depends_on_policy() {
        let lookup: Lookup<()> = Lookup::Indeterminate("connection refused".into());
        assert!(!ExistencePolicy::FailClosed.admits(&lookup));
        assert!(ExistencePolicy::FailOpen.admits(&lookup));
    }

    #[test]
    fn default_policy_is_fail_closed() {
        assert_eq!(ExistencePolicy::default(), ExistencePolicy::FailClosed);
    }
}
