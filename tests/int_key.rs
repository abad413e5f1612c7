use csvdict::{DictError, EmbeddedResources, IntKeyCsvDict, IntKeyError};
use std::{fs::File, io::Write};

const BY_TSN: &str = "\
Name,TSN,Height
Oak,101,20
Pine,102,
Birch,103,x
";

#[test]
fn integer_keyed_reads() {
    let dict = IntKeyCsvDict::from_reader(BY_TSN.as_bytes(), ',', 1).unwrap();
    assert_eq!(dict.row_count(), 3);
    assert_eq!(dict.get_string(101, 0).unwrap(), "Oak");
    assert_eq!(dict.get_integer(101, 2).unwrap(), 20);
    assert_eq!(dict.get_float(101, 2).unwrap(), 20.0);
    assert!(dict.get_float(102, 2).unwrap().is_nan());
    assert_eq!(dict.get_integer(103, 2).unwrap(), i64::MAX);
    // string-keyed reads stay available
    assert_eq!(dict.as_dict().get_string("102", 0).unwrap(), "Pine");
    assert!(matches!(
        dict.get_string(999, 0),
        Err(DictError::RowNotFound { ref key, .. }) if key == "999"
    ));
}

#[test]
fn empty_table_is_a_dictionary_error() {
    match IntKeyCsvDict::from_reader("# header only\nName,TSN\n".as_bytes(), ',', 1) {
        Err(IntKeyError::Dict(DictError::NoData { .. })) => {}
        other => panic!("expected NoData, got {other:?}"),
    }
}

#[test]
fn non_integer_key_is_an_invalid_argument() {
    match IntKeyCsvDict::from_reader(BY_TSN.as_bytes(), ',', 0) {
        Err(IntKeyError::InvalidArgument { key }) => assert_eq!(key, "Oak"),
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
    // a bad key further down is caught too
    let late = "id,v\n1,a\n2,b\nthree,c\n";
    assert!(matches!(
        IntKeyCsvDict::from_reader(late.as_bytes(), ',', 0),
        Err(IntKeyError::InvalidArgument { ref key }) if key == "three"
    ));
}

#[test]
fn load_errors_pass_through() {
    assert!(matches!(
        IntKeyCsvDict::from_reader("a,b\n1,2\n".as_bytes(), ',', 4),
        Err(IntKeyError::Dict(DictError::KeyIndexOutOfRange { .. }))
    ));
    let none = EmbeddedResources::new();
    assert!(matches!(
        IntKeyCsvDict::from_resource("missing.csv", ',', 0, &none),
        Err(IntKeyError::Dict(DictError::ResourceNotFound { .. }))
    ));
}

#[tokio::test]
async fn opens_from_path_sync_and_async() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("by_tsn.csv");
    File::create(&path)?.write_all(BY_TSN.as_bytes())?;

    let sync = IntKeyCsvDict::from_path(&path, ',', 1)?;
    let from_async = IntKeyCsvDict::open(&path, ',', 1).await?;
    assert_eq!(sync.fingerprint(), from_async.fingerprint());
    assert_eq!(from_async.get_string(103, 0)?, "Birch");
    Ok(())
}
