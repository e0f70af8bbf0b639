use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::models::{FilteredPub, Publication};

/// Writes search results as a JSON array, one object per publication.
///
/// Optional fields that were not requested are left out of the objects.
pub fn write_json(path: impl AsRef<Path>, pubs: &[FilteredPub]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, pubs)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %path.display(), records = pubs.len(), "exported search results");
    Ok(())
}

/// Reads publication records from a JSON array, as produced by the extraction pipeline.
pub fn read_publications(path: impl AsRef<Path>) -> Result<Vec<Publication>> {
    let file = File::open(path.as_ref())?;
    let publications: Vec<Publication> = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(publications)
}
