mod common;

use common::{init_logger, write_features, StubModel};
use rustvc::{
    load_stats, ArtifactLayout, ArtifactLoad, ArtifactSave, ConvertError, FitConfig,
    ModelArtifact, ModelSchema, NormalizationConfig, NpyArrayStore, TrainConfig, TrainRequest,
    Trainer,
};
use tempfile::TempDir;

struct TrainDirs {
    source: TempDir,
    target: TempDir,
    save: TempDir,
}

impl TrainDirs {
    fn new() -> Self {
        TrainDirs {
            source: tempfile::tempdir().unwrap(),
            target: tempfile::tempdir().unwrap(),
            save: tempfile::tempdir().unwrap(),
        }
    }
    fn request(&self) -> TrainRequest {
        TrainRequest {
            base_model: None,
            source_dir: self.source.path().to_path_buf(),
            target_dir: self.target.path().to_path_buf(),
            save_dir: self.save.path().join("out"),
        }
    }
}

fn train_config() -> TrainConfig {
    TrainConfig {
        fit: FitConfig {
            epochs: 2,
            ..FitConfig::default()
        },
        normalization: NormalizationConfig::default(),
    }
}

#[test]
fn it_trains_and_saves_model_and_statistics() {
    init_logger();
    let dirs = TrainDirs::new();
    write_features(dirs.source.path(), "0001.npy", 100, 24);
    write_features(dirs.target.path(), "0001.npy", 100, 2);
    let store = NpyArrayStore;
    let model = StubModel::identity();
    let outcome = Trainer::new(&store, &model, train_config())
        .train(&dirs.request())
        .unwrap();
    assert_eq!(outcome.frames, 100);
    assert_eq!(outcome.source_params.offset().len(), 24);
    assert_eq!(outcome.source_params.scale().len(), 24);
    assert_eq!(outcome.target_params.offset().len(), 2);
    assert_eq!(outcome.target_params.scale().len(), 2);
    assert_eq!(model.fit_calls.get(), 1);
    let layout = ArtifactLayout::new(&dirs.save.path().join("out"));
    assert_eq!(outcome.layout, layout);
    let files = layout.files();
    assert_eq!(files.len(), 5);
    for file in &files {
        assert!(file.is_file(), "{} was not written", file.display());
    }
    assert!(files[1].ends_with("Source/Means.npy"));
    assert!(files[4].ends_with("Target/Vars.npy"));
    let saved_model = ModelArtifact::load_from_file(&layout.model).unwrap();
    assert_eq!(saved_model.schema, ModelSchema::new(24, 2));
    let saved_source = load_stats(&store, &layout.source_stats).unwrap();
    assert_eq!(saved_source, outcome.source_params);
}

#[test]
fn it_fails_before_fitting_on_frame_count_mismatch() {
    let dirs = TrainDirs::new();
    write_features(dirs.source.path(), "0001.npy", 100, 24);
    write_features(dirs.target.path(), "0001.npy", 99, 2);
    let store = NpyArrayStore;
    let model = StubModel::identity();
    let result = Trainer::new(&store, &model, train_config()).train(&dirs.request());
    match result {
        Err(ConvertError::FrameCountMismatch {
            source_frames,
            target_frames,
            ..
        }) => {
            assert_eq!(source_frames, 100);
            assert_eq!(target_frames, 99);
        }
        _ => panic!("expected a frame count mismatch"),
    }
    assert_eq!(model.fit_calls.get(), 0);
    assert!(!dirs.save.path().join("out").exists());
}

#[test]
fn it_fails_before_fitting_on_dimension_changes_across_files() {
    let dirs = TrainDirs::new();
    write_features(dirs.source.path(), "0001.npy", 10, 24);
    write_features(dirs.target.path(), "0001.npy", 10, 2);
    write_features(dirs.source.path(), "0002.npy", 10, 23);
    write_features(dirs.target.path(), "0002.npy", 10, 2);
    let store = NpyArrayStore;
    let model = StubModel::identity();
    let result = Trainer::new(&store, &model, train_config()).train(&dirs.request());
    assert!(matches!(
        result,
        Err(ConvertError::DimensionMismatch {
            expected: 24,
            actual: 23,
            ..
        })
    ));
    assert_eq!(model.fit_calls.get(), 0);
    assert!(!dirs.save.path().join("out").exists());
}

#[test]
fn it_fails_on_empty_directories() {
    let dirs = TrainDirs::new();
    let store = NpyArrayStore;
    let model = StubModel::identity();
    let result = Trainer::new(&store, &model, train_config()).train(&dirs.request());
    assert!(matches!(result, Err(ConvertError::EmptyDataset { .. })));
    assert_eq!(model.fit_calls.get(), 0);
}

#[test]
fn it_fails_on_a_missing_directory() {
    let dirs = TrainDirs::new();
    let mut request = dirs.request();
    request.target_dir = dirs.target.path().join("missing");
    let store = NpyArrayStore;
    let model = StubModel::identity();
    let result = Trainer::new(&store, &model, train_config()).train(&request);
    assert!(matches!(result, Err(ConvertError::MissingInputFile { .. })));
}

#[test]
fn it_validates_the_base_model_before_fitting() {
    let dirs = TrainDirs::new();
    write_features(dirs.source.path(), "0001.npy", 20, 4);
    write_features(dirs.target.path(), "0001.npy", 20, 4);
    let store = NpyArrayStore;
    let model = StubModel::identity();
    let mut request = dirs.request();
    request.base_model = Some(dirs.save.path().join("missing_base"));
    let result = Trainer::new(&store, &model, train_config()).train(&request);
    assert!(matches!(result, Err(ConvertError::MissingArtifact { .. })));
    let base_path = dirs.save.path().join("base");
    ModelArtifact::new("stub", ModelSchema::new(4, 3), Vec::new())
        .save_to_file(&base_path)
        .unwrap();
    request.base_model = Some(base_path);
    let result = Trainer::new(&store, &model, train_config()).train(&request);
    assert!(matches!(
        result,
        Err(ConvertError::DimensionMismatch {
            expected: 4,
            actual: 3,
            ..
        })
    ));
    assert_eq!(model.fit_calls.get(), 0);
}

#[test]
fn it_normalizes_training_data_with_its_own_statistics() {
    let dirs = TrainDirs::new();
    write_features(dirs.source.path(), "a.npy", 50, 3);
    write_features(dirs.target.path(), "a.npy", 50, 3);
    let store = NpyArrayStore;
    let model = StubModel::identity();
    let outcome = Trainer::new(&store, &model, train_config())
        .train(&dirs.request())
        .unwrap();
    // same features on both sides give the same statistics
    assert_eq!(outcome.source_params, outcome.target_params);
    assert!(outcome.source_params.scale().iter().all(|s| *s > 0.));
}

#[test]
fn it_reports_an_unwritable_save_directory() {
    let dirs = TrainDirs::new();
    write_features(dirs.source.path(), "a.npy", 20, 3);
    write_features(dirs.target.path(), "a.npy", 20, 2);
    let mut request = dirs.request();
    request.save_dir = dirs.save.path().join("taken");
    std::fs::write(&request.save_dir, b"a file, not a directory").unwrap();
    let store = NpyArrayStore;
    let model = StubModel::identity();
    let result = Trainer::new(&store, &model, train_config()).train(&request);
    assert!(matches!(result, Err(ConvertError::PersistenceError { .. })));
    assert_eq!(model.fit_calls.get(), 1);
}
