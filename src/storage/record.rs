//! Line codecs for the flat-file backend.
//!
//! Each record type declares its field order once in `FIELDS`; encoding and
//! decoding follow that order. Only scalar-only entities have a codec.

use std::str::FromStr;

use crate::model::{Identifiable, Location, Trainer};
use crate::storage::error::RepositoryError;

/// Field separator of the file format.
pub const DELIMITER: char = ',';

/// An entity that can be written as one delimited line.
pub trait FileRecord: Identifiable + Sized {
    /// Field names in declared order.
    const FIELDS: &'static [&'static str];

    fn to_fields(&self) -> Vec<String>;

    fn from_fields(fields: &[&str]) -> Result<Self, RepositoryError>;
}

/// Encode a record as one line, without the trailing newline.
pub fn encode<T: FileRecord>(record: &T) -> Result<String, RepositoryError> {
    let fields = record.to_fields();
    for (name, value) in T::FIELDS.iter().zip(&fields) {
        if value.contains(DELIMITER) || value.contains('\n') || value.contains('\r') {
            return Err(RepositoryError::InvalidArgument(format!(
                "{} field '{}' contains a delimiter or line break",
                T::KIND,
                name
            )));
        }
    }
    Ok(fields.join(&DELIMITER.to_string()))
}

/// Decode one line into a record.
pub fn decode<T: FileRecord>(line: &str) -> Result<T, RepositoryError> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != T::FIELDS.len() {
        return Err(RepositoryError::Deserialization(format!(
            "{} record has {} fields, expected {}",
            T::KIND,
            fields.len(),
            T::FIELDS.len()
        )));
    }
    T::from_fields(&fields)
}

/// Coerce the field at `index` into a primitive.
pub fn field<V>(fields: &[&str], index: usize, name: &str) -> Result<V, RepositoryError>
where
    V: FromStr,
    V::Err: std::fmt::Display,
{
    let raw = fields.get(index).ok_or_else(|| {
        RepositoryError::Deserialization(format!("Missing field '{}'", name))
    })?;
    raw.parse::<V>()
        .map_err(|e| RepositoryError::Deserialization(format!("Invalid {} '{}': {}", name, raw, e)))
}

impl FileRecord for Trainer {
    const FIELDS: &'static [&'static str] = &["id", "name", "mail", "phone", "specialization"];

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.mail.clone(),
            self.phone.clone(),
            self.specialization.clone(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, RepositoryError> {
        Ok(Trainer {
            id: field(fields, 0, "id")?,
            name: field(fields, 1, "name")?,
            mail: field(fields, 2, "mail")?,
            phone: field(fields, 3, "phone")?,
            specialization: field(fields, 4, "specialization")?,
        })
    }
}

impl FileRecord for Location {
    const FIELDS: &'static [&'static str] = &["id", "name", "address"];

    fn to_fields(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), self.address.clone()]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, RepositoryError> {
        Ok(Location {
            id: field(fields, 0, "id")?,
            name: field(fields, 1, "name")?,
            address: field(fields, 2, "address")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_follows_declared_order() {
        let trainer = Trainer::new(3, "Kim", "kim@gym.test", "555-0100", "pilates");
        assert_eq!(
            encode(&trainer).unwrap(),
            "3,Kim,kim@gym.test,555-0100,pilates"
        );
    }

    #[test]
    fn test_decode_location() {
        let location: Location = decode("2,Downtown,Main Street 5").unwrap();
        assert_eq!(location, Location::new(2, "Downtown", "Main Street 5"));
    }

    #[test]
    fn test_commas_in_text_are_rejected() {
        let location = Location::new(1, "North", "5 Elm St, Springfield");
        assert!(matches!(
            encode(&location),
            Err(RepositoryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_surrounding_spaces_are_kept() {
        let location = Location::new(4, " Annex ", "Dock 2 ");
        let line = encode(&location).unwrap();
        assert_eq!(decode::<Location>(&line).unwrap(), location);
    }

    #[test]
    fn test_wrong_field_count() {
        let result = decode::<Location>("1,North");
        assert!(matches!(result, Err(RepositoryError::Deserialization(_))));
    }

    #[test]
    fn test_primitive_coercion() {
        let fields = ["42", "3.5", "true", "text", "nope"];
        assert_eq!(field::<i64>(&fields, 0, "int").unwrap(), 42);
        assert_eq!(field::<f64>(&fields, 1, "float").unwrap(), 3.5);
        assert!(field::<bool>(&fields, 2, "flag").unwrap());
        assert_eq!(field::<String>(&fields, 3, "text").unwrap(), "text");
        assert!(field::<bool>(&fields, 4, "flag").is_err());
        assert!(field::<i64>(&fields, 9, "missing").is_err());
    }

    #[test]
    fn test_bad_id_is_a_deserialization_error() {
        let result = decode::<Location>("abc,North,Street");
        assert!(matches!(result, Err(RepositoryError::Deserialization(_))));
    }
}
