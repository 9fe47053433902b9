//! Explorer and controller tests over a synthetic table and model.


use constellation_explorer::query::{Range, RangeFilter};
use constellation_explorer::render::{render_view, RenderConfig};
use constellation_explorer::{
    Controller, Event, Explorer, ExplorerPaths, InputState, ModelArtifacts, NumericField,
    PredictConfig, StarTable, Submission, TrainConfig, View,
};
use test_data::synthetic_stars;

fn explorer() -> Explorer {
    let stars = synthetic_stars(25, 21);
    let model = ModelArtifacts::train(&stars, &TrainConfig::default()).unwrap();
    Explorer::new(StarTable::new(stars), model)
}

#[test]
fn test_default_selection_is_interquartile() {
    let explorer = explorer();
    let sliders = explorer.sliders();
    assert_eq!(sliders.len(), 5);
    for s in &sliders {
        assert!(s.min <= s.value.lo && s.value.lo <= s.value.hi && s.value.hi <= s.max);
    }

    let controller = Controller::new(&explorer);
    assert_eq!(controller.state().filter, explorer.default_filter());
    let views = controller.initial_views();
    assert_eq!(views.len(), 1);
    match &views[0] {
        View::Selection(selection) => {
            let expected = explorer.default_filter().apply(explorer.table().stars()).len();
            assert_eq!(selection.summary.total, expected);
            assert_eq!(selection.rows.len(), expected);
        }
        other => panic!("expected a selection, got {:?}", other),
    }
}

#[test]
fn test_range_events_recompute_selection() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
    let explorer = explorer();
    let mut controller = Controller::new(&explorer);

    // Open every range, then narrow declination to the southern cluster
    for field in NumericField::ALL {
        let views = controller.handle(Event::SetRange(field, Range::UNBOUNDED));
        assert_eq!(views.len(), 1);
    }
    let views = controller.handle(Event::SetRange(
        NumericField::Declination,
        Range::new(-90.0, -15.0),
    ));
    let selection = match &views[0] {
        View::Selection(selection) => selection,
        other => panic!("expected a selection, got {:?}", other),
    };

    let filter =
        RangeFilter::default().with_range(NumericField::Declination, Range::new(-90.0, -15.0));
    let expected = filter.apply(explorer.table().stars());
    assert_eq!(selection.summary.total, expected.len());
    assert!(selection.rows.iter().all(|s| s.declination <= -15.0));

    let top = selection.summary.most_significant.as_ref().unwrap();
    assert_eq!(top.constellation, "Scorpius");
    assert_eq!(selection.counts[0], *top);
    assert_eq!(
        selection.counts.iter().map(|c| c.count).sum::<usize>(),
        selection.summary.total
    );

    // An empty selection
    let views = controller.handle(Event::SetRange(
        NumericField::DistanceLightYear,
        Range::new(-10.0, -1.0),
    ));
    match &views[0] {
        View::Selection(selection) => {
            assert_eq!(selection.summary.total, 0);
            assert_eq!(selection.summary.most_significant_text(), "N/A");
            assert_eq!(selection.summary.average_distance_text(), "0 light years");
        }
        other => panic!("expected a selection, got {:?}", other),
    }
}

#[test]
fn test_profile_and_prediction_events() {
    let explorer = explorer();
    let mut controller = Controller::new(&explorer);

    let views = controller.handle("select Ursa Major".parse().unwrap());
    match &views[..] {
        [View::Profile(profile)] => {
            assert_eq!(profile.constellation, "Ursa Major");
            assert_eq!(profile.num_stars(), 25);
            assert_eq!(profile.star_names.len(), 25);
        }
        other => panic!("expected a profile, got {:?}", other),
    }

    let views = controller.handle("select Draco".parse().unwrap());
    assert!(matches!(&views[..], [View::NoStarData(name)] if name == "Draco"));
    assert!(controller.handle(Event::SelectConstellation(None)).is_empty());

    // Nothing is predicted until the submission is complete
    assert!(controller.handle(Event::Submit).is_empty());
    assert!(controller.handle("name Betelgeuse".parse().unwrap()).is_empty());
    assert!(controller.handle(Event::Submit).is_empty());
    assert!(controller.handle("coords 5.9 7.4".parse().unwrap()).is_empty());

    let views = controller.handle(Event::Submit);
    let report = match &views[..] {
        [View::Prediction(report)] => report,
        other => panic!("expected a prediction, got {:?}", other),
    };
    assert_eq!(report.star_name, "Betelgeuse");
    assert_eq!(report.prediction.constellation, "Orion");

    let text = render_view(&views[0], &RenderConfig::default());
    assert!(text.contains("Your star's name is: Betelgeuse"));
    assert!(text.contains("Predicted Constellation: Orion"));
    assert!(text.contains("consisting of 100 records"));
}

#[test]
fn test_explorer_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let stars = synthetic_stars(20, 8);
    let paths = ExplorerPaths {
        data: dir.path().join("data").join("cleaned_data.csv"),
        models: dir.path().join("models"),
    };
    StarTable::new(stars.clone()).save_to_file(&paths.data).unwrap();
    ModelArtifacts::train(&stars, &TrainConfig::default())
        .unwrap()
        .save_to_dir(&paths.models)
        .unwrap();

    let explorer = Explorer::load(&paths).unwrap();
    assert_eq!(explorer.table().len(), 80);
    assert_eq!(explorer.table().constellations().len(), 4);
    assert_eq!(explorer.model().props.num_records, 80);

    let missing = ExplorerPaths {
        data: paths.data.clone(),
        models: dir.path().join("nowhere"),
    };
    assert!(Explorer::load(&missing).is_err());
}

#[test]
fn test_controller_resumes_from_snapshot() {
    let explorer = explorer();
    let state = InputState {
        filter: RangeFilter::default()
            .with_range(NumericField::RightAscension, Range::new(15.0, 19.0)),
        constellation: Some("Scorpius".to_string()),
        submission: Submission {
            star_name: Some("Antares".to_string()),
            right_ascension: Some(16.49),
            declination: Some(-26.43),
        },
    };
    let mut controller = Controller::with_state(&explorer, state.clone());
    assert_eq!(controller.state(), &state);

    match &controller.initial_views()[..] {
        [View::Selection(selection)] => {
            assert!(selection.summary.total > 0);
            assert!(selection.rows.iter().all(|s| s.constellation == "Scorpius"));
        }
        other => panic!("expected a selection, got {:?}", other),
    }

    // The restored submission is complete, so submit predicts right away
    match &controller.handle(Event::Submit)[..] {
        [View::Prediction(report)] => {
            assert_eq!(report.star_name, "Antares");
            assert_eq!(report.prediction.constellation, "Scorpius");
        }
        other => panic!("expected a prediction, got {:?}", other),
    }
}

#[test]
fn test_predict_config_threshold() {
    let stars = synthetic_stars(25, 21);
    let model = ModelArtifacts::train(&stars, &TrainConfig::default()).unwrap();
    let submission = Submission {
        star_name: Some("Between".to_string()),
        right_ascension: Some(8.0),
        declination: Some(30.0),
    };

    let lenient = Explorer::new(StarTable::new(stars.clone()), model.clone());
    let strict = Explorer::new(StarTable::new(stars), model).with_predict_config(PredictConfig {
        min_probability: 0.5,
        ..Default::default()
    });

    let all = lenient.predict(&submission).unwrap().prediction;
    let top = strict.predict(&submission).unwrap().prediction;
    assert_eq!(all.constellation, top.constellation);
    assert!(top.probabilities.len() <= 1);
    assert!(top.probabilities.iter().all(|p| p.probability > 0.5));
    assert!(all.probabilities.len() >= top.probabilities.len());
}
