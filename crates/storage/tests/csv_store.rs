use std::fs::File;
use std::path::Path;

use storage::csv::CsvAnnotationStore;
use storage::index::{DEFAULT_EXTENSIONS, FileIndex};
use storage::repository::{AnnotationRepository, AnnotationRow, StorageError};
use tirads_core::{
    Assessment, Composition, EchogenicFocus, Echogenicity, FociSet, Margin, NoduleShape,
    TiradsLevel,
};

fn touch(path: &Path) {
    File::create(path).unwrap();
}

fn benign_assessment() -> Assessment {
    Assessment::new(
        Composition::CysticOrCompletelyCystic,
        Echogenicity::Anechoic,
        NoduleShape::WiderThanTall,
        Margin::Smooth,
        FociSet::new(),
    )
}

#[test]
fn store_round_trips_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("a.jpg"));
    touch(&dir.path().join("b.jpg"));
    let index =
        FileIndex::load_or_create(dir.path().join("file_names.csv"), dir.path(), &DEFAULT_EXTENSIONS)
            .unwrap();
    let store_path = dir.path().join("annotations.csv");

    let mut store = CsvAnnotationStore::load_or_init(&store_path, &index).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.first_unset(), Some(0));

    let suspicious = Assessment::new(
        Composition::SolidOrCompletelySolid,
        Echogenicity::VeryHypoechoic,
        NoduleShape::TallerThanWide,
        Margin::ExtraThyroidalExtension,
        [
            EchogenicFocus::Macrocalcifications,
            EchogenicFocus::PunctateEchogenicFoci,
        ]
        .into(),
    );
    let identity = index.get(0).unwrap().to_owned();
    store
        .save(0, AnnotationRow::set(identity.clone(), suspicious.clone()))
        .unwrap();

    let reopened = CsvAnnotationStore::load_or_init(&store_path, &index).unwrap();
    let row = reopened.get(0).unwrap();
    assert_eq!(row.filename, identity);
    assert_eq!(row.assessment, Some(suspicious));
    assert!(reopened.get(1).unwrap().is_unset());
    assert_eq!(reopened.first_unset(), Some(1));
}

#[test]
fn persisted_points_and_level_are_not_recomputed_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let index = FileIndex::from_entries(vec!["a.jpg".into()]);
    let store_path = dir.path().join("annotations.csv");

    // Deliberately inconsistent score, as a store edited elsewhere might hold.
    let odd = Assessment::from_persisted(
        Composition::Spongiform,
        Echogenicity::Anechoic,
        NoduleShape::WiderThanTall,
        Margin::Smooth,
        FociSet::new(),
        9,
        TiradsLevel::Tr5,
    );
    {
        let mut store = CsvAnnotationStore::load_or_init(&store_path, &index).unwrap();
        store
            .save(0, AnnotationRow::set("a.jpg", odd.clone()))
            .unwrap();
    }

    let reopened = CsvAnnotationStore::load_or_init(&store_path, &index).unwrap();
    let loaded = reopened.get(0).unwrap().assessment.unwrap();
    assert_eq!(loaded.points, 9);
    assert_eq!(loaded.level, TiradsLevel::Tr5);
}

#[test]
fn existing_store_is_not_reconciled_with_a_larger_index() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("annotations.csv");

    let original = FileIndex::from_entries(vec!["a.jpg".into()]);
    CsvAnnotationStore::load_or_init(&store_path, &original).unwrap();

    // Reopening with a grown index must not add rows.
    let grown = FileIndex::from_entries(vec!["a.jpg".into(), "b.jpg".into()]);
    let store = CsvAnnotationStore::load_or_init(&store_path, &grown).unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn empty_index_initializes_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let index = FileIndex::from_entries(Vec::new());
    let store =
        CsvAnnotationStore::load_or_init(dir.path().join("annotations.csv"), &index).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.first_unset(), None);
}

#[test]
fn save_beyond_bounds_fails_fast_without_touching_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let index = FileIndex::from_entries(vec!["a.jpg".into()]);
    let store_path = dir.path().join("annotations.csv");
    let mut store = CsvAnnotationStore::load_or_init(&store_path, &index).unwrap();

    let err = store
        .save(3, AnnotationRow::set("x.jpg", benign_assessment()))
        .unwrap_err();
    assert!(matches!(err, StorageError::OutOfBounds { position: 3, len: 1 }));

    let reopened = CsvAnnotationStore::load_or_init(&store_path, &index).unwrap();
    assert_eq!(reopened.len(), 1);
    assert!(reopened.get(0).unwrap().is_unset());
}

#[test]
fn foci_set_of_zero_or_more_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let index = FileIndex::from_entries(vec!["a.jpg".into(), "b.jpg".into()]);
    let store_path = dir.path().join("annotations.csv");
    let mut store = CsvAnnotationStore::load_or_init(&store_path, &index).unwrap();

    let none_selected = benign_assessment();
    assert!(none_selected.foci.is_empty());
    let all_selected = Assessment::new(
        Composition::MixedCysticAndSolid,
        Echogenicity::Hypoechoic,
        NoduleShape::WiderThanTall,
        Margin::IllDefined,
        EchogenicFocus::ALL.into(),
    );
    store
        .save(0, AnnotationRow::set("a.jpg", none_selected.clone()))
        .unwrap();
    store
        .save(1, AnnotationRow::set("b.jpg", all_selected.clone()))
        .unwrap();

    let reopened = CsvAnnotationStore::load_or_init(&store_path, &index).unwrap();
    assert_eq!(reopened.get(0).unwrap().assessment, Some(none_selected));
    assert_eq!(reopened.get(1).unwrap().assessment, Some(all_selected));
}
