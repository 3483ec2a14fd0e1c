//! Newest-wins conflict resolution.
//!
//! Pure decision logic: given the local and/or remote version of a
//! record, pick a winner and say which side needs a write-through so
//! both replicas converge within one reconciliation pass.

use curio_core::Versioned;

/// The outcome of resolving one record id.
#[derive(Debug, Clone)]
pub struct Resolution<T> {
    /// The winning record, already sanitized.
    pub winner: T,
    /// The local replica must be overwritten with the winner.
    pub write_local: bool,
    /// The remote replica must be upserted with the winner.
    pub write_remote: bool,
}

/// Resolve a record present on at least one side.
///
/// - Only local: local wins, write through to remote.
/// - Only remote: remote wins, write through to local.
/// - Both: strictly greater `updated_at` wins; a one-sided timestamp
///   wins; equal or both-missing timestamps fall to the remote
///   (deterministic tie-break).
///
/// Returns `None` only when both sides are absent.
pub fn resolve<T: Versioned>(local: Option<T>, remote: Option<T>) -> Option<Resolution<T>> {
    let resolution = match (local, remote) {
        (Some(local), None) => Resolution {
            winner: local,
            write_local: false,
            write_remote: true,
        },
        (None, Some(remote)) => Resolution {
            winner: remote,
            write_local: true,
            write_remote: false,
        },
        (Some(local), Some(remote)) => {
            let local_wins = match (local.updated_at(), remote.updated_at()) {
                (Some(l), Some(r)) => l > r,
                (Some(_), None) => true,
                _ => false,
            };
            if local_wins {
                Resolution {
                    winner: local,
                    write_local: false,
                    write_remote: true,
                }
            } else {
                Resolution {
                    winner: remote,
                    write_local: true,
                    write_remote: false,
                }
            }
        }
        (None, None) => return None,
    };

    let mut resolution = resolution;
    resolution.winner.sanitize();
    Some(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    #[derive(Debug, Clone, PartialEq)]
    struct Rec {
        id: String,
        updated_at: Option<DateTime<Utc>>,
        value: &'static str,
    }

    impl Versioned for Rec {
        fn record_id(&self) -> &str {
            &self.id
        }
        fn updated_at(&self) -> Option<DateTime<Utc>> {
            self.updated_at
        }
    }

    fn rec(secs: Option<i64>, value: &'static str) -> Rec {
        Rec {
            id: "r".into(),
            updated_at: secs.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
            value,
        }
    }

    #[test]
    fn only_local_wins_and_writes_remote() {
        let r = resolve(Some(rec(Some(1), "local")), None).unwrap();
        assert_eq!(r.winner.value, "local");
        assert!(r.write_remote);
        assert!(!r.write_local);
    }

    #[test]
    fn only_remote_wins_and_writes_local() {
        let r = resolve(None, Some(rec(Some(1), "remote"))).unwrap();
        assert_eq!(r.winner.value, "remote");
        assert!(r.write_local);
        assert!(!r.write_remote);
    }

    #[test]
    fn strictly_newer_side_wins() {
        let r = resolve(Some(rec(Some(2), "local")), Some(rec(Some(1), "remote"))).unwrap();
        assert_eq!(r.winner.value, "local");

        let r = resolve(Some(rec(Some(1), "local")), Some(rec(Some(2), "remote"))).unwrap();
        assert_eq!(r.winner.value, "remote");
    }

    #[test]
    fn one_sided_timestamp_wins() {
        let r = resolve(Some(rec(Some(1), "local")), Some(rec(None, "remote"))).unwrap();
        assert_eq!(r.winner.value, "local");

        let r = resolve(Some(rec(None, "local")), Some(rec(Some(1), "remote"))).unwrap();
        assert_eq!(r.winner.value, "remote");
    }

    #[test]
    fn ties_and_missing_timestamps_fall_to_remote() {
        let r = resolve(Some(rec(Some(5), "local")), Some(rec(Some(5), "remote"))).unwrap();
        assert_eq!(r.winner.value, "remote");

        let r = resolve(Some(rec(None, "local")), Some(rec(None, "remote"))).unwrap();
        assert_eq!(r.winner.value, "remote");
    }

    #[test]
    fn nothing_to_resolve() {
        assert!(resolve::<Rec>(None, None).is_none());
    }
}
