use async_compression::tokio::write::{GzipEncoder, ZstdEncoder};
use csvdict::{CsvDict, CsvMeta, DictError, DictOptions};
use std::io::Cursor;
use tokio::io::AsyncWriteExt;

fn sample(rows: usize) -> String {
    let mut text = String::from("# generated\nsku,qty,price\n");
    for i in 0..rows {
        text.push_str(&format!("SKU{i:06},{i},{}.25\n", i % 100));
        if i % 1000 == 0 {
            text.push_str("\n# checkpoint\n");
        }
    }
    text
}

async fn gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut enc = GzipEncoder::new(Vec::new());
    enc.write_all(bytes).await?;
    enc.shutdown().await?;
    Ok(enc.into_inner())
}

async fn zstd(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut enc = ZstdEncoder::new(Vec::new());
    enc.write_all(bytes).await?;
    enc.shutdown().await?;
    Ok(enc.into_inner())
}

#[tokio::test]
async fn compressed_files_match_plain_load() -> anyhow::Result<()> {
    let text = sample(20_000);
    let dir = tempfile::tempdir()?;
    let plain = dir.path().join("items.csv");
    let gz = dir.path().join("items.csv.gz");
    let zst = dir.path().join("items.csv.zst");
    std::fs::write(&plain, &text)?;
    std::fs::write(&gz, gzip(text.as_bytes()).await?)?;
    std::fs::write(&zst, zstd(text.as_bytes()).await?)?;

    let expected = CsvDict::from_path(&plain, ',', 0)?;
    assert_eq!(expected.row_count(), 20_000);

    for path in [&plain, &gz, &zst] {
        let dict = CsvDict::open(path, ',', 0).await?;
        assert_eq!(dict.row_count(), 20_000, "{}", path.display());
        assert_eq!(dict.field_names(), ["sku", "qty", "price"]);
        assert_eq!(dict.fingerprint(), expected.fingerprint());
        assert_eq!(dict.get_integer("SKU012345", 1)?, 12_345);
        assert_eq!(dict.get_float("SKU012345", 2)?, 45.25);
    }
    Ok(())
}

#[tokio::test]
async fn transcodes_legacy_charsets() -> anyhow::Result<()> {
    let text = "Name;Town\nBélanger;Montréal\nMüller;Köln\n";
    let (latin1, _, unmappable) = encoding_rs::WINDOWS_1252.encode(text);
    assert!(!unmappable);

    let meta = CsvMeta {
        charset: encoding_rs::WINDOWS_1252,
        ..CsvMeta::from_name("towns.csv")
    };
    let options = DictOptions::new(';', 0).with_source_name("towns.csv");
    let dict = CsvDict::from_async_reader(Cursor::new(latin1.into_owned()), meta, options).await?;
    assert_eq!(dict.get_string("Bélanger", 1)?, "Montréal");
    assert_eq!(dict.get_string("Müller", 1)?, "Köln");
    Ok(())
}

#[tokio::test]
async fn gzip_stream_by_content_encoding() -> anyhow::Result<()> {
    let bytes = gzip(b"k,v\na,1\n").await?;
    let meta = CsvMeta {
        content_encoding: "gzip".into(),
        ..Default::default()
    };
    let dict = CsvDict::from_async_reader(Cursor::new(bytes), meta, DictOptions::default()).await?;
    assert_eq!(dict.get_integer("a", 1)?, 1);
    Ok(())
}

#[tokio::test]
async fn async_errors() {
    assert!(matches!(
        CsvDict::open("/definitely/not/here.csv.gz", ',', 0).await,
        Err(DictError::Io { .. })
    ));
    let bad_utf8 = Cursor::new(b"k,v\n\xff\xfe,1\n".to_vec());
    assert!(matches!(
        CsvDict::from_async_reader(bad_utf8, CsvMeta::default(), DictOptions::default()).await,
        Err(DictError::Decode { .. })
    ));
    let header_only = Cursor::new(b"k,v\n".to_vec());
    let dict = CsvDict::from_async_reader(header_only, CsvMeta::default(), DictOptions::new(',', 1))
        .await
        .unwrap();
    assert!(dict.is_empty());
}
