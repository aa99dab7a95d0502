//! Représentation 2D des données en bases ADN
//!
//! Chaque colonne correspond à un segment ADN et chaque cellule à une base
//! (valeur 0..=3). Les colonnes sont accédées par leur numéro logique (la clé),
//! pas par leur position physique: au décodage les segments arrivent dans le
//! désordre et des clés peuvent manquer. Une table clé → position est
//! reconstruite par [`MemoryLayout::reindex`] après toute mutation de clés.

use std::collections::HashMap;
use std::ops::Range;

use crate::error::{CodecError, Result};

/// Opérations d'un stockage de layout, pour permettre d'autres
/// implémentations que le stockage en mémoire
pub trait LayoutStore {
    fn num_rows(&self) -> usize;
    fn num_columns(&self) -> usize;
    fn get_pos(&self, row: usize, key: usize) -> Result<u8>;
    fn set_pos(&mut self, row: usize, key: usize, value: u8) -> Result<()>;
    fn get_column(&self, key: usize) -> Result<&[u8]>;
    fn get_line(&self, row: usize, keys: Range<usize>) -> Vec<u8>;
    fn add_column(&mut self, key: usize);
    fn pop_column(&mut self, key: usize) -> Result<Vec<u8>>;
    fn column_keys(&self) -> Vec<usize>;
    fn reindex(&mut self);
}

#[derive(Debug, Clone)]
struct Column {
    key: usize,
    cells: Vec<u8>,
}

/// Stockage en mémoire: un vecteur de colonnes plus l'indexation par clé
#[derive(Debug, Clone, Default)]
pub struct MemoryLayout {
    rows: usize,
    columns: Vec<Column>,
    key_index: HashMap<usize, usize>,
}

impl MemoryLayout {
    /// Crée un layout de `rows` × `n_columns` cellules nulles, clés 0..n
    pub fn new(rows: usize, n_columns: usize) -> Self {
        let columns: Vec<Column> = (0..n_columns)
            .map(|key| Column {
                key,
                cells: vec![0u8; rows],
            })
            .collect();
        let mut layout = Self {
            rows,
            columns,
            key_index: HashMap::new(),
        };
        layout.reindex();
        layout
    }

    /// Crée un layout vide de `rows` lignes
    pub fn with_rows(rows: usize) -> Self {
        Self {
            rows,
            columns: Vec::new(),
            key_index: HashMap::new(),
        }
    }

    fn position(&self, key: usize) -> Result<usize> {
        self.key_index.get(&key).copied().ok_or_else(|| {
            CodecError::Internal(format!("colonne absente du layout: clé {key}"))
        })
    }

    /// Nombre de lignes
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Nombre de colonnes
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Lit une cellule
    pub fn get_pos(&self, row: usize, key: usize) -> Result<u8> {
        let pos = self.position(key)?;
        Ok(self.columns[pos].cells[row])
    }

    /// Écrit une cellule
    pub fn set_pos(&mut self, row: usize, key: usize, value: u8) -> Result<()> {
        let pos = self.position(key)?;
        self.columns[pos].cells[row] = value;
        Ok(())
    }

    /// Colonne complète par clé
    pub fn get_column(&self, key: usize) -> Result<&[u8]> {
        let pos = self.position(key)?;
        Ok(&self.columns[pos].cells)
    }

    /// Cellules d'une ligne pour les clés de l'intervalle, par clés croissantes
    pub fn get_line(&self, row: usize, keys: Range<usize>) -> Vec<u8> {
        let mut selected: Vec<usize> = self
            .key_index
            .keys()
            .copied()
            .filter(|k| keys.contains(k))
            .collect();
        selected.sort_unstable();
        selected
            .into_iter()
            .map(|k| self.columns[self.key_index[&k]].cells[row])
            .collect()
    }

    /// Insère `n` lignes nulles à partir de `position`, en décalant le reste
    pub fn insert_lines(&mut self, position: usize, n: usize) {
        for col in &mut self.columns {
            col.cells.splice(position..position, std::iter::repeat(0u8).take(n));
        }
        self.rows += n;
    }

    /// Insère `n` colonnes nulles aux clés `at_key..at_key+n`
    ///
    /// Les clés existantes supérieures ou égales à `at_key` sont décalées de
    /// `n`; les nouvelles colonnes sont ajoutées en fin de stockage physique.
    pub fn insert_columns(&mut self, at_key: usize, n: usize) {
        for col in &mut self.columns {
            if col.key >= at_key {
                col.key += n;
            }
        }
        for key in at_key..at_key + n {
            self.columns.push(Column {
                key,
                cells: vec![0u8; self.rows],
            });
        }
        self.reindex();
    }

    /// Ajoute une colonne nulle à la clé donnée, sans décaler les autres
    pub fn add_column(&mut self, key: usize) {
        self.columns.push(Column {
            key,
            cells: vec![0u8; self.rows],
        });
        let pos = self.columns.len() - 1;
        self.key_index.entry(key).or_insert(pos);
    }

    /// Ajoute une colonne avec son contenu à la clé donnée
    ///
    /// Les cellules sont tronquées ou complétées par des zéros pour tenir
    /// exactement sur le nombre de lignes du layout.
    pub fn push_column(&mut self, key: usize, mut cells: Vec<u8>) {
        cells.resize(self.rows, 0);
        self.columns.push(Column { key, cells });
        let pos = self.columns.len() - 1;
        self.key_index.entry(key).or_insert(pos);
    }

    /// Retire la colonne de clé donnée et la retourne
    pub fn pop_column(&mut self, key: usize) -> Result<Vec<u8>> {
        let pos = self.position(key)?;
        let col = self.columns.remove(pos);
        self.reindex();
        Ok(col.cells)
    }

    /// Clés de colonnes, triées
    pub fn column_keys(&self) -> Vec<usize> {
        let mut keys: Vec<usize> = self.key_index.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Reconstruit la table clé → position
    ///
    /// En cas de clés dupliquées, la première colonne rencontrée gagne.
    pub fn reindex(&mut self) {
        self.key_index.clear();
        for (pos, col) in self.columns.iter().enumerate() {
            self.key_index.entry(col.key).or_insert(pos);
        }
    }

    /// Clé et cellules de la colonne à la position physique donnée
    pub fn column_by_position(&self, position: usize) -> (usize, &[u8]) {
        let col = &self.columns[position];
        (col.key, &col.cells)
    }

    /// Change la clé de la colonne à la position physique donnée
    ///
    /// La table d'indexation doit être reconstruite ensuite par `reindex`.
    pub fn renumber(&mut self, position: usize, new_key: usize) {
        self.columns[position].key = new_key;
    }

    /// Retire la colonne à la position physique donnée
    ///
    /// La table d'indexation doit être reconstruite ensuite par `reindex`.
    pub fn pop_position(&mut self, position: usize) {
        self.columns.remove(position);
    }
}

impl LayoutStore for MemoryLayout {
    fn num_rows(&self) -> usize {
        MemoryLayout::num_rows(self)
    }
    fn num_columns(&self) -> usize {
        MemoryLayout::num_columns(self)
    }
    fn get_pos(&self, row: usize, key: usize) -> Result<u8> {
        MemoryLayout::get_pos(self, row, key)
    }
    fn set_pos(&mut self, row: usize, key: usize, value: u8) -> Result<()> {
        MemoryLayout::set_pos(self, row, key, value)
    }
    fn get_column(&self, key: usize) -> Result<&[u8]> {
        MemoryLayout::get_column(self, key)
    }
    fn get_line(&self, row: usize, keys: Range<usize>) -> Vec<u8> {
        MemoryLayout::get_line(self, row, keys)
    }
    fn add_column(&mut self, key: usize) {
        MemoryLayout::add_column(self, key)
    }
    fn pop_column(&mut self, key: usize) -> Result<Vec<u8>> {
        MemoryLayout::pop_column(self, key)
    }
    fn column_keys(&self) -> Vec<usize> {
        MemoryLayout::column_keys(self)
    }
    fn reindex(&mut self) {
        MemoryLayout::reindex(self)
    }
}
