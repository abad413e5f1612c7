use csvdict::{CsvDict, IntKeyCsvDict};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // gzip is picked from the extension
    let species = CsvDict::open(Path::new("./data/species.csv.gz"), ',', 0).await?;
    let height = species
        .column_position("Height")
        .ok_or_else(|| anyhow::anyhow!("missing Height column"))?;

    for name in species.filtered_column("Name", "Canopy", "1").unwrap_or_default() {
        // blank or malformed heights read back as NaN
        let h = species.get_float(name, height)?;
        println!("{name}: {h}");
    }

    let by_id = IntKeyCsvDict::from_path("./data/species_by_tsn.csv", ',', 1)?;
    println!("TSN 101 is {}", by_id.get_string(101, 0)?);
    Ok(())
}
