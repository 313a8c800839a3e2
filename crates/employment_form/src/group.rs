//! Repeatable "add more" groups.
//!
//! A group owns its block schema and builds every block from it, so a new
//! block never inherits values from an existing one.

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};

use crate::errors::FormError;
use crate::field::{Field, FieldDef};
use crate::guard::attach_guards;
use crate::payload::GroupRecord;

/// Every group keeps at least this many blocks.
pub const MIN_BLOCKS: usize = 1;

pub type BlockId = u32;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GroupId {
    Employment,
    Education,
    Family,
    Certifications,
}

/// One instance of the group's block schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    id: BlockId,
    fields: Vec<Field>,
    removable: bool,
}

impl Block {
    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn has_remove_control(&self) -> bool {
        self.removable
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct RepeatableGroup {
    id: GroupId,
    schema: Vec<FieldDef>,
    blocks: Vec<Block>,
    next_id: BlockId,
}

impl RepeatableGroup {
    /// New group holding one fresh block.
    pub fn new(id: GroupId, schema: Vec<FieldDef>) -> Self {
        let mut group = Self {
            id,
            schema,
            blocks: Vec::new(),
            next_id: 0,
        };
        let first = group.fresh_block();
        group.blocks.push(first);
        group.normalize();
        group
    }

    /// Block factory: defaults from the schema, guards bound on this block only.
    fn fresh_block(&mut self) -> Block {
        let mut fields: Vec<Field> = self.schema.iter().map(Field::from_def).collect();
        attach_guards(fields.iter_mut());
        let id = self.next_id;
        self.next_id += 1;
        Block {
            id,
            fields,
            removable: false,
        }
    }

    pub fn add_block(&mut self) -> BlockId {
        let block = self.fresh_block();
        let id = block.id;
        self.blocks.push(block);
        self.normalize();
        debug!(group = %self.id, block = id, count = self.blocks.len(), "block added");
        id
    }

    pub fn remove_block(&mut self, block: BlockId) -> Result<(), FormError> {
        let position = self
            .position(block)
            .ok_or(FormError::UnknownBlock { group: self.id, block })?;

        if self.blocks.len() <= MIN_BLOCKS {
            warn!(group = %self.id, block, "refusing to remove the last block");
            return Err(FormError::MinimumBlocks { group: self.id });
        }
        if !self.blocks[position].removable {
            return Err(FormError::NotRemovable { group: self.id, block });
        }

        self.blocks.remove(position);
        self.normalize();
        debug!(group = %self.id, block, count = self.blocks.len(), "block removed");
        Ok(())
    }

    /// Block 0 has no removal control, every other block has exactly one.
    pub fn normalize(&mut self) {
        for (index, block) in self.blocks.iter_mut().enumerate() {
            block.removable = index > 0;
        }
    }

    /// One record per block, in block order; missing names map to `""`.
    pub fn extract(&self, names: &[&str]) -> Vec<GroupRecord> {
        self.blocks
            .iter()
            .map(|block| {
                names
                    .iter()
                    .map(|name| {
                        let value = block.field(name).map(|f| f.value.clone()).unwrap_or_default();
                        (name.to_string(), value)
                    })
                    .collect()
            })
            .collect()
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.schema.iter().map(|def| def.name).collect()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn position(&self, block: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == block)
    }

    pub fn block(&self, block: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == block)
    }

    pub fn block_mut(&mut self, block: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == block)
    }
}
