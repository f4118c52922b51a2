use weno_sieve::config::{DEFAULT_DM, DEFAULT_EPS, DEFAULT_P, WenoConfig};
use weno_sieve::WenoError;

#[test]
fn partial_dictionary_fills_defaults() {
    let cfg: WenoConfig = serde_json::from_str(r#"{ "pol_order": 3, "dm": 50.0 }"#).unwrap();
    assert_eq!(cfg.pol_order, 3);
    assert_eq!(cfg.dm, 50.0);
    assert_eq!(cfg.p, DEFAULT_P);
    assert_eq!(cfg.eps, DEFAULT_EPS);
    assert!(cfg.validate().is_ok());
}

#[test]
fn order_is_required() {
    assert!(serde_json::from_str::<WenoConfig>(r#"{ "p": 2.0 }"#).is_err());
}

#[test]
fn json_round_trip_keeps_factors() {
    let cfg = WenoConfig::new(2).with_p(2.0).with_eps(1e-8);
    let text = serde_json::to_string(&cfg).unwrap();
    let back: WenoConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(back, cfg);
    assert_eq!(WenoConfig::default().dm, DEFAULT_DM);
}

#[test]
fn invalid_values_rejected_after_parsing() {
    let cfg: WenoConfig = serde_json::from_str(r#"{ "pol_order": 0 }"#).unwrap();
    assert!(matches!(cfg.validate(), Err(WenoError::InvalidConfig(_))));
    let cfg: WenoConfig = serde_json::from_str(r#"{ "pol_order": 2, "eps": -1.0 }"#).unwrap();
    assert!(cfg.combiner().is_err());
}
