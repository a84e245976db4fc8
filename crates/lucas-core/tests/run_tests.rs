use lucas_code::is_perfect_code;
use lucas_core::{
    parse_config, run, EngineLimits, LimitViolation, RunConfig, RunError, SeedSource,
    StrategyConfig, StrategyOutcome,
};
use lucas_explore::{GeneticConfig, RepairConfig, SearchBudget};
use lucas_model::{Code, Domain, InvalidInput};

fn config(n: u32, s: u32, strategy: StrategyConfig) -> RunConfig {
    RunConfig {
        n,
        s,
        strategy,
        limits: EngineLimits::default(),
        budget: SearchBudget::unlimited(),
    }
}

#[test]
fn test_puncture_with_automatic_seed() {
    let config = parse_config(include_str!("fixtures/puncture_seven_five.json")).unwrap();
    let report = run(&config).unwrap();
    assert!(report.perfect);
    assert_eq!(report.strategy, "puncture_repair");
    assert_eq!(report.domain_size, 113);
    assert_eq!(report.sphere_bound, 14);
    let code = report.code.unwrap();
    assert_eq!(code.len(), 15);
    assert!(is_perfect_code(&code, &Domain::new(7, 5).unwrap()).unwrap());
    match report.outcome {
        StrategyOutcome::PunctureRepair(outcome) => {
            assert!(outcome.removed.is_empty());
            assert!(outcome.added.is_empty());
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_coset_shift_run() {
    let config = parse_config(include_str!("fixtures/coset_seven_seven.json")).unwrap();
    let report = run(&config).unwrap();
    assert!(report.perfect);
    assert_eq!(report.domain_size, 127);
    assert_eq!(report.code.map(|c| c.len()), Some(16));
}

#[test]
fn test_splice_run() {
    let config = parse_config(include_str!("fixtures/splice_seven_seven.json")).unwrap();
    let report = run(&config).unwrap();
    assert!(report.perfect);
    assert_eq!(report.code.map(|c| c.len()), Some(16));
}

#[test]
fn test_anneal_race_run() {
    let config = parse_config(include_str!("fixtures/anneal_race.json")).unwrap();
    let report = run(&config).unwrap();
    assert!(report.perfect);
    match &report.outcome {
        StrategyOutcome::Anneal(race) => assert_eq!(race.attempts.len(), 4),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(report.code.unwrap().len(), 2);
}

#[test]
fn test_puncture_from_seed_lines() {
    let config = config(
        3,
        3,
        StrategyConfig::PunctureRepair {
            seed: SeedSource::Lines {
                text: "110\n001\n".into(),
            },
            repair: RepairConfig::default(),
        },
    );
    let report = run(&config).unwrap();
    assert!(report.perfect);
    assert_eq!(report.code.unwrap().len(), 2);
}

#[test]
fn test_puncture_seed_of_wrong_width() {
    let config = config(
        7,
        5,
        StrategyConfig::PunctureRepair {
            seed: SeedSource::Code {
                code: Code::new(3).unwrap(),
            },
            repair: RepairConfig::default(),
        },
    );
    let err = run(&config).unwrap_err();
    assert!(matches!(err, RunError::Search(_)));
}

#[test]
fn test_automatic_seed_needs_hamming_length() {
    let config = config(
        6,
        4,
        StrategyConfig::PunctureRepair {
            seed: SeedSource::default(),
            repair: RepairConfig::default(),
        },
    );
    let err = run(&config).unwrap_err();
    assert!(matches!(
        err,
        RunError::Input(InvalidInput::NotHammingLength { n: 6 })
    ));
}

#[test]
fn test_genetic_run_reports_best_individual() {
    let config = config(
        4,
        2,
        StrategyConfig::Genetic(GeneticConfig {
            population_size: 8,
            generations: 5,
            ..Default::default()
        }),
    );
    let report = run(&config).unwrap();
    assert!(!report.perfect);
    assert!(report.code.is_some());
}

#[test]
fn test_invalid_domain_is_rejected() {
    let err = run(&config(7, 1, StrategyConfig::CosetShift(Default::default()))).unwrap_err();
    assert!(matches!(err, RunError::Input(InvalidInput::RunTooShort { .. })));
}

#[test]
fn test_width_limit() {
    let mut config = config(15, 13, StrategyConfig::CosetShift(Default::default()));
    config.limits.max_enumeration_width = 10;
    let err = run(&config).unwrap_err();
    assert!(matches!(
        err,
        RunError::LimitExceeded(LimitViolation::WidthTooLarge { n: 15, max: 10 })
    ));
}

#[test]
fn test_attempt_limit() {
    let mut config = config(
        3,
        3,
        StrategyConfig::Anneal {
            config: Default::default(),
            seeds: (0..10).collect(),
        },
    );
    config.limits.max_parallel_attempts = 4;
    let err = run(&config).unwrap_err();
    assert!(matches!(
        err,
        RunError::LimitExceeded(LimitViolation::TooManyAttempts { count: 10, max: 4 })
    ));
}

#[test]
fn test_duplicate_race_seeds() {
    let config = config(
        3,
        3,
        StrategyConfig::Anneal {
            config: Default::default(),
            seeds: vec![1, 2, 1],
        },
    );
    let err = run(&config).unwrap_err();
    assert!(matches!(err, RunError::Config(_)));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(parse_config("not json"), Err(RunError::Parse(_))));
    assert!(matches!(
        parse_config(r#"{"n": 7, "strategy": {"kind": "anneal"}}"#),
        Err(RunError::Parse(_))
    ));
}

#[test]
fn test_report_serializes_with_strategy_tag() {
    let config = parse_config(include_str!("fixtures/coset_seven_seven.json")).unwrap();
    let report = run(&config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(value["perfect"], true);
    assert_eq!(value["outcome"]["coset_shift"]["outcome"], "found");
    assert_eq!(value["outcome"]["coset_shift"]["shift"], "1000000");
    assert_eq!(value["code"]["width"], 7);
}

#[test]
fn test_automatic_seed_with_unbounded_run_length() {
    let config = config(
        7,
        u32::MAX,
        StrategyConfig::PunctureRepair {
            seed: SeedSource::default(),
            repair: RepairConfig::default(),
        },
    );
    let report = run(&config).unwrap();
    assert!(report.perfect);
    assert_eq!(report.domain_size, 128);
    assert_eq!(report.code.map(|c| c.len()), Some(16));
    match report.outcome {
        StrategyOutcome::PunctureRepair(outcome) => {
            assert!(outcome.removed.is_empty());
            assert!(outcome.added.is_empty());
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}
