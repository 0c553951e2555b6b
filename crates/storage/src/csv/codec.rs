//! Row-level text mapping for the annotation store file.

use tirads_core::model::FociSet;
use tirads_core::{Assessment, TiradsLevel};

use crate::repository::{AnnotationRow, StorageError};

pub(crate) const HEADER: [&str; 8] = [
    "pd_filename",
    "composition",
    "echogenicity",
    "nod_shape",
    "margin",
    "echogenic_foci",
    "tirads_points",
    "tirads_score",
];

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn encode_row(row: &AnnotationRow) -> Vec<String> {
    match &row.assessment {
        None => {
            let mut fields = vec![row.filename.clone()];
            fields.extend(std::iter::repeat_n(String::new(), HEADER.len() - 1));
            fields
        }
        Some(a) => vec![
            row.filename.clone(),
            a.composition.to_string(),
            a.echogenicity.to_string(),
            a.shape.to_string(),
            a.margin.to_string(),
            // JSON array of labels so a set of zero or more values
            // round-trips through one cell.
            foci_to_cell(&a.foci),
            a.points.to_string(),
            a.level.to_string(),
        ],
    }
}

fn foci_to_cell(foci: &FociSet) -> String {
    // Serializing a set of plain enum labels cannot fail.
    serde_json::to_string(foci).unwrap_or_default()
}

fn parse_points(cell: &str) -> Result<u8, StorageError> {
    // Tolerate float formatting such as "4.0" left by tools that treat the
    // points column as a float column.
    if let Ok(v) = cell.parse::<u8>() {
        return Ok(v);
    }
    let v: f64 = cell
        .parse()
        .map_err(|_| StorageError::Serialization(format!("invalid tirads_points: {cell:?}")))?;
    if v.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&v) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(v as u8)
    } else {
        Err(StorageError::Serialization(format!(
            "invalid tirads_points: {cell:?}"
        )))
    }
}

pub(crate) fn decode_row(fields: &[String]) -> Result<AnnotationRow, StorageError> {
    if fields.len() != HEADER.len() {
        return Err(StorageError::Serialization(format!(
            "expected {} columns, found {}",
            HEADER.len(),
            fields.len()
        )));
    }

    let filename = fields[0].clone();
    if fields[1].is_empty() {
        // Unset rows must be fully unset; a row with a blank composition but
        // other populated cells violates the all-or-nothing invariant.
        if fields[2..].iter().any(|f| !f.is_empty()) {
            return Err(StorageError::Serialization(format!(
                "partially filled row for {filename:?}"
            )));
        }
        return Ok(AnnotationRow::unset(filename));
    }

    let composition = fields[1].parse().map_err(ser)?;
    let echogenicity = fields[2].parse().map_err(ser)?;
    let shape = fields[3].parse().map_err(ser)?;
    let margin = fields[4].parse().map_err(ser)?;
    let foci: FociSet = serde_json::from_str(&fields[5]).map_err(ser)?;
    let points = parse_points(&fields[6])?;
    let level: TiradsLevel = fields[7].parse().map_err(ser)?;

    Ok(AnnotationRow::set(
        filename,
        Assessment::from_persisted(composition, echogenicity, shape, margin, foci, points, level),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_line;
    use tirads_core::{Composition, EchogenicFocus, Echogenicity, Margin, NoduleShape};

    fn set_row() -> AnnotationRow {
        AnnotationRow::set(
            "scans/nodule, left.jpg",
            Assessment::new(
                Composition::SolidOrCompletelySolid,
                Echogenicity::VeryHypoechoic,
                NoduleShape::TallerThanWide,
                Margin::LobulatedOrIrregular,
                [EchogenicFocus::PunctateEchogenicFoci].into(),
            ),
        )
    }

    #[test]
    fn encode_decode_round_trips_a_set_row() {
        let row = set_row();
        let back = decode_row(&encode_row(&row)).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn encode_decode_round_trips_an_unset_row() {
        let row = AnnotationRow::unset("a.jpg");
        let back = decode_row(&encode_row(&row)).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn quoted_filename_with_comma_survives_the_line_codec() {
        let row = set_row();
        let text = csv_line::write_record(&encode_row(&row));
        let records = csv_line::parse_records(&text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(decode_row(&records[0]).unwrap(), row);
    }

    #[test]
    fn foci_cell_is_a_json_label_array() {
        let fields = encode_row(&set_row());
        assert_eq!(fields[5], "[\"Punctate echogenic foci\"]");
    }

    #[test]
    fn float_formatted_points_are_accepted() {
        assert_eq!(parse_points("4").unwrap(), 4);
        assert_eq!(parse_points("4.0").unwrap(), 4);
        assert!(parse_points("4.5").is_err());
        assert!(parse_points("-1").is_err());
        assert!(parse_points("nan").is_err());
    }

    #[test]
    fn partially_filled_row_is_rejected() {
        let mut fields = encode_row(&AnnotationRow::unset("a.jpg"));
        fields[6] = "4".into();
        let err = decode_row(&fields).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn unknown_label_is_a_hard_error() {
        let mut fields = encode_row(&set_row());
        fields[1] = "Solidish".into();
        assert!(matches!(
            decode_row(&fields),
            Err(StorageError::Serialization(_))
        ));
    }
}
