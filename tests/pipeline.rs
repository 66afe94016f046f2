mod common;

use common::{init_logger, write_features};
use rustvc::{
    ArrayStore, FitConfig, McepNN, McepNNConfig, NormalizationConfig, NpyArrayStore, Predictor,
    TrainConfig, TrainRequest, Trainer,
};

fn small_nn() -> McepNN {
    McepNN::new(McepNNConfig {
        hidden_size: 16,
        hidden_layers: 2,
    })
}

#[test]
fn it_trains_retrains_and_converts_with_the_mcep_network() {
    init_logger();
    let source_dir = tempfile::tempdir().unwrap();
    let target_dir = tempfile::tempdir().unwrap();
    let save_dir = tempfile::tempdir().unwrap();
    write_features(source_dir.path(), "a.npy", 60, 6);
    write_features(source_dir.path(), "b.npy", 40, 6);
    write_features(target_dir.path(), "a.npy", 60, 6);
    write_features(target_dir.path(), "b.npy", 40, 6);
    let store = NpyArrayStore;
    let model = small_nn();
    let config = TrainConfig {
        fit: FitConfig {
            epochs: 3,
            batch_size: 32,
            ..FitConfig::default()
        },
        normalization: NormalizationConfig::default(),
    };
    let request = TrainRequest {
        base_model: None,
        source_dir: source_dir.path().to_path_buf(),
        target_dir: target_dir.path().to_path_buf(),
        save_dir: save_dir.path().join("first"),
    };
    let outcome = Trainer::new(&store, &model, config).train(&request).unwrap();
    assert_eq!(outcome.frames, 100);

    let retrain_request = TrainRequest {
        base_model: Some(outcome.layout.model.clone()),
        save_dir: save_dir.path().join("second"),
        ..request
    };
    let retrained = Trainer::new(&store, &model, config)
        .train(&retrain_request)
        .unwrap();

    let predictor = Predictor::load(
        &store,
        &model,
        &retrained.layout.model,
        &retrained.layout.source_stats,
        &retrained.layout.target_stats,
    )
    .unwrap();
    let output_path = save_dir.path().join("converted.npy");
    let frames = predictor
        .convert_file(&store, &source_dir.path().join("b.npy"), &output_path)
        .unwrap();
    assert_eq!(frames, 40);
    let output = store.load_matrix(&output_path).unwrap();
    assert_eq!(output.dim(), (40, 6));
    assert!(output.iter().all(|v| v.is_finite()));
}
