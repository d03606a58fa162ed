//! EXIF tag reader on top of `kamadak-exif`.
//!
//! Handles every container the crate understands (JPEG, TIFF, PNG, WebP,
//! HEIF). Values are rendered for humans: ASCII fields without quotes,
//! everything else through the crate's display formatting.

use crate::error::MetadataError;
use exif::{Field, In, Reader, Value};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Tag name → display value. When a tag appears in several IFDs the primary
/// image's value wins, then the first one read.
pub fn read_exif(path: &Path) -> Result<BTreeMap<String, String>, MetadataError> {
    let file = File::open(path).map_err(|e| MetadataError::Exif(e.to_string()))?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(container)) => {
            debug!(path = %path.display(), container, "No EXIF block");
            return Ok(BTreeMap::new());
        }
        Err(e) => return Err(MetadataError::Exif(e.to_string())),
    };

    Ok(exif
        .fields()
        .sorted_by_key(|f| f.ifd_num != In::PRIMARY)
        .unique_by(|f| f.tag)
        .map(|f| (f.tag.to_string(), render(f)))
        .collect())
}

fn render(field: &Field) -> String {
    match &field.value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').trim().to_string())
            .join(", "),
        _ => field.display_value().to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use exif::Tag;
    use exif::experimental::Writer;
    use std::io::Cursor;

    /// A TIFF file holding nothing but the given ASCII fields in IFD0.
    pub(crate) fn tiff_with_fields(fields: &[(Tag, &str)]) -> Vec<u8> {
        let fields: Vec<Field> = fields
            .iter()
            .map(|(tag, value)| Field {
                tag: *tag,
                ifd_num: In::PRIMARY,
                value: Value::Ascii(vec![value.as_bytes().to_vec()]),
            })
            .collect();
        let mut writer = Writer::new();
        for field in &fields {
            writer.push_field(field);
        }
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_reads_ascii_fields_without_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagged.tif");
        std::fs::write(
            &path,
            tiff_with_fields(&[(Tag::Software, "Midjourney v6"), (Tag::Make, "Canon")]),
        )
        .unwrap();

        let fields = read_exif(&path).unwrap();
        assert_eq!(fields.get("Software").map(String::as_str), Some("Midjourney v6"));
        assert_eq!(fields.get("Make").map(String::as_str), Some("Canon"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = read_exif(Path::new("/definitely/not/here.jpg")).unwrap_err();
        assert_eq!(err.field(), "exif");
    }
}
