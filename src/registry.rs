//! Bidirectional name/slot registry for a single layout
//!
//! A [`LayoutRegistry`] is built once from an ordered list of
//! [`FieldDecl`]s and is read-only afterwards. Fields without an explicit
//! slot take the lowest free slot at or above a counter that starts at 0 and
//! only advances on implicit fields; slots claimed by earlier fields are
//! skipped.

use std::collections::HashMap;

use crate::error::LayoutError;
use crate::types::{FieldDecl, FieldSpec, IndexCollision};

/// Immutable set of named fields with index→name and name→index lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRegistry {
    label: String,
    fields: Vec<FieldSpec>,
    /// slot -> position in `fields`
    by_index: HashMap<u32, usize>,
    /// name -> position in `fields`
    by_name: HashMap<String, usize>,
}

impl LayoutRegistry {
    /// Build a registry, rejecting duplicate names and colliding slots.
    ///
    /// # Errors
    /// * `LayoutError::EmptyName` - a declaration has an empty name
    /// * `LayoutError::DuplicateName` - two declarations share a name
    /// * `LayoutError::DuplicateIndex` - two declarations resolve to one slot
    pub fn new<I>(label: impl Into<String>, decls: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = FieldDecl>,
    {
        Self::with_policy(label, decls, IndexCollision::Reject)
    }

    /// Build a registry with an explicit slot collision policy.
    ///
    /// Under [`IndexCollision::LastWins`] a later field pinned to an occupied
    /// slot evicts the earlier field entirely: the earlier name stops
    /// resolving and the new field takes its place in declaration order.
    /// Duplicate names among surviving fields are rejected under every policy.
    pub fn with_policy<I>(
        label: impl Into<String>,
        decls: I,
        policy: IndexCollision,
    ) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = FieldDecl>,
    {
        let label = label.into();
        let decls = decls.into_iter();
        let mut fields: Vec<FieldSpec> = Vec::with_capacity(decls.size_hint().0);
        let mut by_index: HashMap<u32, usize> = HashMap::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut next_implicit: u32 = 0;

        for (position, decl) in decls.enumerate() {
            if decl.name.is_empty() {
                return Err(LayoutError::EmptyName { layout: label, position });
            }
            if by_name.contains_key(&decl.name) {
                return Err(LayoutError::DuplicateName {
                    layout: label,
                    name: decl.name,
                });
            }

            let index = match decl.index {
                Some(index) => index,
                None => {
                    while by_index.contains_key(&next_implicit) {
                        next_implicit += 1;
                    }
                    let index = next_implicit;
                    next_implicit += 1;
                    index
                }
            };

            let field = FieldSpec {
                index,
                name: decl.name,
                description: decl.description,
            };

            match by_index.get(&index).copied() {
                None => {
                    by_index.insert(index, fields.len());
                    by_name.insert(field.name.clone(), fields.len());
                    fields.push(field);
                }
                Some(previous) => match policy {
                    IndexCollision::Reject => {
                        return Err(LayoutError::DuplicateIndex {
                            layout: label,
                            index,
                            first: fields[previous].name.clone(),
                            second: field.name,
                        });
                    }
                    IndexCollision::LastWins => {
                        let evicted = std::mem::replace(&mut fields[previous], field);
                        tracing::warn!(
                            layout = %label,
                            index,
                            "slot {:#04x} reassigned from '{}' to '{}'",
                            index,
                            evicted.name,
                            fields[previous].name
                        );
                        by_name.remove(&evicted.name);
                        by_name.insert(fields[previous].name.clone(), previous);
                    }
                },
            }
        }

        tracing::debug!(layout = %label, fields = fields.len(), "layout registry built");

        Ok(Self {
            label,
            fields,
            by_index,
            by_name,
        })
    }

    /// Name of the field occupying `index`.
    pub fn lookup_name(&self, index: u32) -> Result<&str, LayoutError> {
        self.by_index
            .get(&index)
            .map(|&pos| self.fields[pos].name.as_str())
            .ok_or(LayoutError::UnknownIndex(index))
    }

    /// Slot of the field called `name`.
    pub fn lookup_index(&self, name: &str) -> Result<u32, LayoutError> {
        self.get(name)
            .map(|field| field.index)
            .ok_or_else(|| LayoutError::UnknownName(name.to_string()))
    }

    /// Description of the field called `name` (empty if it has none).
    pub fn describe(&self, name: &str) -> Result<&str, LayoutError> {
        self.get(name)
            .map(|field| field.description.as_str())
            .ok_or_else(|| LayoutError::UnknownName(name.to_string()))
    }

    /// Field called `name`, if any.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.by_name.get(name).map(|&pos| &self.fields[pos])
    }

    /// Field occupying `index`, if any.
    pub fn get_by_index(&self, index: u32) -> Option<&FieldSpec> {
        self.by_index.get(&index).map(|&pos| &self.fields[pos])
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn contains_index(&self, index: u32) -> bool {
        self.by_index.contains_key(&index)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Label used in logs and error messages.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Incremental construction of a [`LayoutRegistry`]
///
/// # Example
/// ```
/// use hr20_layout::LayoutBuilder;
///
/// let layout = LayoutBuilder::new("demo")
///     .field("lcd_contrast", "")
///     .field("temperature0", "frost protection")
///     .field_at(0xff, "LAYOUT_VERSION", "")
///     .build()
///     .unwrap();
/// assert_eq!(layout.lookup_index("temperature0").unwrap(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutBuilder {
    label: String,
    decls: Vec<FieldDecl>,
}

impl LayoutBuilder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            decls: Vec::new(),
        }
    }

    /// Append a field at the next implicit slot.
    pub fn field(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.decls.push(FieldDecl::implicit(name, description));
        self
    }

    /// Append a field pinned to `index`.
    pub fn field_at(
        mut self,
        index: u32,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.decls.push(FieldDecl::at(index, name, description));
        self
    }

    pub fn build(self) -> Result<LayoutRegistry, LayoutError> {
        LayoutRegistry::new(self.label, self.decls)
    }

    pub fn build_with(self, policy: IndexCollision) -> Result<LayoutRegistry, LayoutError> {
        LayoutRegistry::with_policy(self.label, self.decls, policy)
    }
}
