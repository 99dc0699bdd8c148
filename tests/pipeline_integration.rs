//! End-to-end tests for the import and export stages.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use dreamport::io::formats::{RowEncoding, collection, rows};
use dreamport::io::{CsvRowSource, RowSource};
use dreamport::services::{
    DateZone, ExportOptions, ExportService, ImportOptions, ImportService, SequentialIds,
};
use dreamport::{Error, FinalDream};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 2022-01-01T12:00:00Z.
const NEW_YEAR_2022: i64 = 1_641_038_400_000;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(entries: &str, labels: &str) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("dream_info"), entries).unwrap();
        std::fs::write(dir.path().join("labels_info"), labels).unwrap();
        let sample = json!([
            {"_id": "old-dream", "_rev": "1-a", "type": "dream", "title": "Old", "description": "",
             "tags": ["old-tag"], "realism": 2, "lucidity": 3, "date": 20_200_101},
            {"_id": "tpl-dream", "_rev": "1-b", "type": "dream", "title": "", "description": "",
             "tags": [], "characters": [], "places": [], "emotions": [], "realism": 0,
             "lucidity": 0, "isLucid": false, "isNightmare": false, "isRecurrent": false,
             "date": 20_200_101, "dateNegative": 20_200_101, "clarity": 0},
            {"_id": "tpl-tag", "_rev": "1-c", "title": "Template", "category": "tag", "color": "#fff"}
        ]);
        std::fs::write(dir.path().join("bk.lucidity"), sample.to_string()).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn import(&self) -> dreamport::Result<dreamport::services::ImportResult> {
        let options = ImportOptions::default().with_timezone(DateZone::Utc);
        let service = ImportService::from_sample_file(&self.path("bk.lucidity"), options)?;
        service.import_files(
            &self.path("dream_info"),
            &self.path("labels_info"),
            &self.path("generated.lucidity"),
            &mut SequentialIds::new(),
            None,
        )
    }
}

fn recategorize(values: &mut [Value], title: &str, category: &str, new_title: &str) {
    let tag = values
        .iter_mut()
        .find(|v| v["title"] == title && v.get("category").is_some())
        .expect("tag present");
    tag["category"] = json!(category);
    tag["title"] = json!(new_title);
}

fn export_rows(values: Vec<Value>, out: &Path) -> String {
    let file = std::fs::File::create(out).unwrap();
    ExportService::new(ExportOptions::default())
        .export_to_writer(file, values)
        .unwrap();
    std::fs::read_to_string(out).unwrap()
}

#[test]
fn test_import_then_export_round_trip() {
    let fixture = Fixture::new(
        &format!("Flying多Over the city多[Lucid,CityPark]多{NEW_YEAR_2022}多"),
        "CityPark\n",
    );

    let result = fixture.import().unwrap();
    assert_eq!(result.tags, 1);
    assert_eq!(result.dreams, 1);
    assert_eq!(result.unresolved_labels, 1);

    let mut values = collection::read_collection_file(&fixture.path("generated.lucidity")).unwrap();
    assert_eq!(values.len(), 2);

    let dream = &values[1];
    assert_eq!(dream["type"], "dream");
    assert_eq!(dream["date"], 20_220_101);
    assert_eq!(dream["dateNegative"], 20_220_101);
    assert_eq!(dream["isLucid"], true);
    assert_eq!(dream["clarity"], 0);
    assert_eq!(dream["tags"][0], Value::Null);
    assert_eq!(dream["tags"][1], values[0]["_id"]);
    assert_eq!(values[0]["color"], "#fff");

    recategorize(&mut values, "CityPark", "place", "City Park");
    let text = export_rows(values, &fixture.path("rows.csv"));
    assert_eq!(
        text,
        "Rmx5aW5n,T3ZlciB0aGUgY2l0eQ==,20220101,50,0,,,,Q2l0eSBQYXJr\n"
    );
}

#[test]
fn test_missing_template_writes_nothing() {
    let fixture = Fixture::new("a多b多[]多0多", "");
    std::fs::write(
        fixture.path("bk.lucidity"),
        json!([{"_id": "t", "title": "x", "category": "tag"}]).to_string(),
    )
    .unwrap();

    let err = fixture.import().unwrap_err();
    assert!(matches!(err, Error::MissingTemplate("dream")));
    assert!(!fixture.path("generated.lucidity").exists());
}

#[test]
fn test_malformed_entries_write_nothing() {
    let fixture = Fixture::new("a多b多[]多0多only two多fields多", "x\n");

    let err = fixture.import().unwrap_err();
    assert!(matches!(err, Error::MalformedRecord { record: 2, .. }));
    assert!(!fixture.path("generated.lucidity").exists());
}

#[test]
fn test_unknown_category_aborts_export() {
    let fixture = Fixture::new(&format!("Chase多Run多[WILD]多{NEW_YEAR_2022}多"), "WILD\n");
    fixture.import().unwrap();

    let mut values = collection::read_collection_file(&fixture.path("generated.lucidity")).unwrap();
    recategorize(&mut values, "WILD", "technique", "WILD");

    let err = ExportService::new(ExportOptions::default())
        .convert(values)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownCategory { ref category, .. } if category == "technique"));
}

#[test]
fn test_every_bucket_and_decode() {
    let fixture = Fixture::new(
        &format!("Reunion多Saw an old friend多[Mom,Joy,Home,Flying]多{NEW_YEAR_2022}多"),
        "Mom\nJoy\nHome\nFlying\n",
    );
    fixture.import().unwrap();

    let mut values = collection::read_collection_file(&fixture.path("generated.lucidity")).unwrap();
    recategorize(&mut values, "Mom", "character", "Mom");
    recategorize(&mut values, "Joy", "emotion", "Joy");
    recategorize(&mut values, "Home", "place", "Home");

    let rows_path = fixture.path("rows.csv");
    export_rows(values, &rows_path);

    let file = std::fs::File::open(&rows_path).unwrap();
    let mut source = CsvRowSource::new(file, RowEncoding::default());
    let dream = source.next().unwrap().unwrap();
    assert!(source.next().unwrap().is_none());

    assert_eq!(
        dream,
        FinalDream {
            title: "Reunion".to_string(),
            description: "Saw an old friend".to_string(),
            date: 20_220_101,
            lucidity: 0,
            nightmare: false,
            tags: vec!["Flying".to_string()],
            people: vec!["Mom".to_string()],
            feelings: vec!["Joy".to_string()],
            places: vec!["Home".to_string()],
        }
    );
}

#[test]
fn test_encoded_numeric_fields() {
    let dream = FinalDream {
        title: "t".to_string(),
        date: 20_220_101,
        lucidity: 50,
        nightmare: true,
        ..FinalDream::default()
    };
    let encoding = RowEncoding {
        encode_numeric_fields: true,
    };
    let record = rows::to_record(&dream, encoding);
    assert_eq!(record[2], rows::encode("20220101"));
    assert_eq!(record[3], rows::encode("50"));
    assert_eq!(record[4], rows::encode("1"));

    let parsed = rows::from_record(&csv::StringRecord::from(record.to_vec()), encoding).unwrap();
    assert_eq!(parsed, dream);
}
