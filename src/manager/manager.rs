use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use super::managererror::{parse_json_value, ManagerError, ManagerResult};

// ─────────────────────────────────────────────────────────────────────────────
// ManagerBuilder / FrozenManager
// ─────────────────────────────────────────────────────────────────────────────
//
// 載入期間使用可變的 ManagerBuilder，載入完成後 build() 成唯讀的
// FrozenManager，之後只透過 Arc 分享。

pub struct ManagerBuilder<V: ?Sized> {
    map: HashMap<String, Arc<V>>,
}

impl<V: ?Sized> ManagerBuilder<V> {
    pub fn new() -> Self {
        ManagerBuilder { map: HashMap::new() }
    }

    pub fn get(&self, name: &str) -> ManagerResult<Arc<V>> {
        self.map
            .get(name)
            .cloned()
            .ok_or_else(|| ManagerError::name_not_found(name))
    }

    pub fn insert(&mut self, name: String, value: Arc<V>) {
        self.map.insert(name, value);
    }

    pub fn build(self) -> FrozenManager<V> {
        FrozenManager { map: self.map }
    }
}

impl<V: ?Sized> Default for ManagerBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FrozenManager<V: ?Sized> {
    map: HashMap<String, Arc<V>>,
}

impl<V: ?Sized> FrozenManager<V> {
    pub fn empty() -> Self {
        FrozenManager { map: HashMap::new() }
    }

    pub fn get(&self, name: &str) -> ManagerResult<Arc<V>> {
        self.map
            .get(name)
            .cloned()
            .ok_or_else(|| ManagerError::name_not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IManager
// ─────────────────────────────────────────────────────────────────────────────

/// Loader of named objects of type `V` from JSON, with `S` the already-loaded
/// objects it may reference (calendars for indices, and so on).
pub trait IManager<V: ?Sized, S> {
    fn insert_obj_from_json(
        &self,
        builder: &mut ManagerBuilder<V>,
        json_value: serde_json::Value,
        supports: &S,
    ) -> ManagerResult<()>;

    fn insert_obj_from_json_vec(
        &self,
        builder: &mut ManagerBuilder<V>,
        json_vec: &[serde_json::Value],
        supports: &S,
    ) -> ManagerResult<()> {
        for json_value in json_vec.iter() {
            self.insert_obj_from_json(builder, json_value.clone(), supports)?;
        }
        Ok(())
    }

    fn from_json_vec(&self, json_vec: &[serde_json::Value], supports: &S) -> ManagerResult<FrozenManager<V>> {
        let mut builder = ManagerBuilder::new();
        self.insert_obj_from_json_vec(&mut builder, json_vec, supports)?;
        Ok(builder.build())
    }

    /// Reads either one object or an array of objects.
    fn from_reader<R: Read>(&self, reader: R, supports: &S) -> ManagerResult<FrozenManager<V>>
    where
        Self: Sized,
    {
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        let json_vec: Vec<serde_json::Value> = if json_value.is_array() {
            parse_json_value(json_value)?
        } else {
            vec![json_value]
        };
        self.from_json_vec(&json_vec, supports)
    }
}
