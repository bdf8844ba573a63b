use std::collections::HashMap;

use crate::models::MasterRow;

/// Vocabulario nombre <-> id sustituto, sólo de crecimiento.
///
/// La comparación ignora espacios al borde y mayúsculas/minúsculas ASCII; el nombre
/// guardado es el de la primera aparición (recortado).
#[derive(Debug, Clone)]
pub struct Vocabulary {
    rows: Vec<MasterRow>,
    index: HashMap<String, i64>,
    next_id: i64,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary::new()
    }
}

impl Vocabulary {
    pub fn new() -> Self {
        Vocabulary { rows: Vec::new(), index: HashMap::new(), next_id: 1 }
    }

    /// Reconstruye un vocabulario a partir de filas ya numeradas (p.ej. un
    /// maestro leído de CSV). Los ids nuevos continúan desde el máximo.
    pub fn from_rows<I: IntoIterator<Item = MasterRow>>(rows: I) -> Self {
        let mut vocab = Vocabulary::new();
        for row in rows {
            let key = match_key(&row.name);
            if key.is_empty() || vocab.index.contains_key(&key) {
                continue;
            }
            vocab.next_id = vocab.next_id.max(row.id + 1);
            vocab.index.insert(key, row.id);
            vocab.rows.push(MasterRow { id: row.id, name: row.name.trim().to_string() });
        }
        vocab
    }

    /// Devuelve el id existente o asigna el siguiente. Nombres vacíos -> None.
    pub fn get_or_create(&mut self, name: &str) -> Option<i64> {
        let key = match_key(name);
        if key.is_empty() {
            return None;
        }
        if let Some(id) = self.index.get(&key) {
            return Some(*id);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.index.insert(key, id);
        self.rows.push(MasterRow { id, name: name.trim().to_string() });
        Some(id)
    }

    pub fn lookup(&self, name: &str) -> Option<i64> {
        self.index.get(&match_key(name)).copied()
    }

    pub fn rows(&self) -> &[MasterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Clave de comparación de nombres de maestros.
///
/// Sólo pliega mayúsculas ASCII, igual que `COLLATE NOCASE` en SQLite; así
/// la extracción y la carga directa producen los mismos maestros.
pub fn match_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
