use std::fs;
use std::path::PathBuf;

use shadowpost::config::AppConfig;
use shadowpost::model::coeffs::{ModelLoadError, load_model};
use shadowpost::model::selection::{PoliticalModel, TopicModel};
use shadowpost::sim::session::Session;

fn unique_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "shadowpost_model_{}_{}",
        name,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    path
}

fn base_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.sampling.seed = Some(11);
    cfg.sampling.static_users = 100;
    cfg
}

#[test]
fn valid_resources_switch_both_stages_to_fitted() {
    let political = unique_path("political.json");
    let topic = unique_path("topic.json");
    fs::write(
        &political,
        r#"{"intercept": 0.05, "linear": 0.02, "quadratic": 0.01, "clip": [0.0, 0.9]}"#,
    )
    .unwrap();
    fs::write(&topic, r#"{"b0": 0.0, "b1": 0.0, "b2": 1.0}"#).unwrap();

    let mut cfg = base_config();
    cfg.models.political_path = Some(political.clone());
    cfg.models.topic_path = Some(topic.clone());
    let session = Session::new(&cfg).expect("session");

    match session.selection().political {
        PoliticalModel::Fitted(m) => assert_eq!(m.clip, Some((0.0, 0.9))),
        other => panic!("expected fitted political model, got {other:?}"),
    }
    assert!(matches!(session.selection().topic, TopicModel::Fitted(_)));
    assert!((session.selection().political_probability(100.0) - 0.9).abs() < 1e-12);

    let _ = fs::remove_file(&political);
    let _ = fs::remove_file(&topic);
}

#[test]
fn missing_or_broken_resources_fall_back_without_error() {
    let broken = unique_path("broken.json");
    fs::write(&broken, "{ not json").unwrap();

    let mut cfg = base_config();
    cfg.models.political_path = Some(broken.clone());
    cfg.models.topic_path = Some(unique_path("absent.json"));
    let mut session = Session::new(&cfg).expect("fallback must not fail");

    assert!(matches!(session.selection().political, PoliticalModel::Fallback(_)));
    assert!(matches!(session.selection().topic, TopicModel::AbsoluteExtremity));
    session.sample_many(50);
    assert_eq!(session.counters().users, 50);

    let _ = fs::remove_file(&broken);
}

#[test]
fn direct_load_reports_the_failure_kind() {
    let absent = unique_path("nothing.json");
    assert!(matches!(load_model(&absent), Err(ModelLoadError::Io { .. })));

    let nan = unique_path("nan.json");
    fs::write(&nan, r#"{"intercept": 1e400, "linear": 0, "quadratic": 0}"#).unwrap();
    assert!(load_model(&nan).is_err());
    let _ = fs::remove_file(&nan);
}
