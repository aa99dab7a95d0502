//! Encapsulation ZIP de la charge utile
//!
//! La charge utile est rangée dans un conteneur ZIP sous l'entrée unique
//! `information_package` avant encodage, et extraite après décodage. Le
//! conteneur absorbe les octets de bourrage de la dernière colonne: la
//! lecture ZIP retrouve ses structures par le répertoire central et ignore
//! ce qui traîne derrière.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{CodecError, Result};

/// Nom de l'entrée portant la charge utile
pub const PACKAGE_ENTRY: &str = "information_package";

/// Enveloppe la charge utile dans un conteneur ZIP (Deflate)
pub fn wrap_payload(data: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = ZipWriter::new(&mut cursor);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer
        .start_file(PACKAGE_ENTRY, options)
        .map_err(|e| CodecError::Container(e.to_string()))?;
    writer.write_all(data)?;
    writer
        .finish()
        .map_err(|e| CodecError::Container(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Extrait la charge utile du conteneur ZIP
pub fn unwrap_payload(data: &[u8]) -> Result<Vec<u8>> {
    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| CodecError::Container(e.to_string()))?;
    let mut entry = archive
        .by_name(PACKAGE_ENTRY)
        .map_err(|e| CodecError::Container(e.to_string()))?;
    let mut out = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_unwrap_roundtrip() {
        let payload = b"contenu du paquet d'information".to_vec();
        let wrapped = wrap_payload(&payload).unwrap();
        assert_ne!(wrapped, payload);
        assert_eq!(unwrap_payload(&wrapped).unwrap(), payload);
    }

    #[test]
    fn test_empty_payload() {
        let wrapped = wrap_payload(&[]).unwrap();
        assert!(!wrapped.is_empty());
        assert_eq!(unwrap_payload(&wrapped).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_trailing_padding_is_tolerated() {
        let payload = vec![42u8; 1000];
        let mut wrapped = wrap_payload(&payload).unwrap();
        wrapped.extend_from_slice(&[0u8; 97]);
        assert_eq!(unwrap_payload(&wrapped).unwrap(), payload);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            unwrap_payload(b"pas un zip"),
            Err(CodecError::Container(_))
        ));
    }
}
