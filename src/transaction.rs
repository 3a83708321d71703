//! Transaction payloads split into types and caller-side validation

pub mod types;
pub mod validation;

pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_json_orders_keys_lexicographically() {
        let tx = Transfer::new("alice", "bob", 50.0);
        assert_eq!(
            tx.canonical_json(),
            r#"{"amount":50.0,"from":"alice","to":"bob"}"#
        );
    }

    #[test]
    fn test_canonical_json_escapes_strings() {
        let tx = Transfer::new("al\"ice", "b\nob", 1.5);
        assert_eq!(
            tx.canonical_json(),
            r#"{"amount":1.5,"from":"al\"ice","to":"b\nob"}"#
        );
    }

    #[test]
    fn test_canonical_json_matches_serde_form() {
        // The explicit encoder and the serde derive agree for finite amounts.
        let tx = Transfer::new("carol", "dave", 0.25);
        let via_serde = serde_json::to_string(&tx).unwrap();
        assert_eq!(tx.canonical_json(), via_serde);
    }

    #[test]
    fn test_non_finite_amount_encodes_as_null() {
        let tx = Transfer::new("a", "b", f64::NAN);
        assert_eq!(tx.canonical_json(), r#"{"amount":null,"from":"a","to":"b"}"#);
    }

    #[test]
    fn test_genesis_payload_encodes_as_null() {
        assert_eq!(canonical_payload(None), "null");
        let tx = Transfer::new("a", "b", 2.0);
        assert_eq!(canonical_payload(Some(&tx)), tx.canonical_json());
    }

    #[test]
    fn test_validate_rejects_empty_parties() {
        assert!(Transfer::new("", "bob", 1.0).validate().is_err());
        assert!(Transfer::new("alice", "   ", 1.0).validate().is_err());
        assert!(Transfer::new("alice", "bob", 1.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite_amount() {
        assert!(Transfer::new("alice", "bob", f64::INFINITY).validate().is_err());
        assert!(Transfer::new("alice", "bob", f64::NAN).validate().is_err());
        // Sign is not the ledger's concern.
        assert!(Transfer::new("alice", "bob", -3.0).validate().is_ok());
    }
}
