//! Nodes: the common shape shared by groups and cells.

use crate::cell::CellData;
use crate::ids::NodeId;

/// Group payload: an ordered container of child nodes. Carries no
/// geometry; used purely for organization (layers, scoping).
#[derive(Clone, Debug, Default)]
pub struct GroupData {
    pub children: Vec<NodeId>,
}

/// Payload of a node.
#[derive(Clone, Debug)]
pub enum NodeData {
    Group(GroupData),
    Cell(CellData),
}

/// A node in the complex. `parent` is `None` only for the root group.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub data: NodeData,
}

impl Node {
    pub fn new_group(id: NodeId, parent: Option<NodeId>) -> Self {
        Self {
            id,
            parent,
            data: NodeData::Group(GroupData::default()),
        }
    }

    pub fn new_cell(id: NodeId, parent: NodeId, cell: CellData) -> Self {
        Self {
            id,
            parent: Some(parent),
            data: NodeData::Cell(cell),
        }
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self.data, NodeData::Group(_))
    }

    #[inline]
    pub fn is_cell(&self) -> bool {
        matches!(self.data, NodeData::Cell(_))
    }

    pub fn as_group(&self) -> Option<&GroupData> {
        match &self.data {
            NodeData::Group(g) => Some(g),
            NodeData::Cell(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut GroupData> {
        match &mut self.data {
            NodeData::Group(g) => Some(g),
            NodeData::Cell(_) => None,
        }
    }

    pub fn as_cell(&self) -> Option<&CellData> {
        match &self.data {
            NodeData::Cell(c) => Some(c),
            NodeData::Group(_) => None,
        }
    }

    pub fn as_cell_mut(&mut self) -> Option<&mut CellData> {
        match &mut self.data {
            NodeData::Cell(c) => Some(c),
            NodeData::Group(_) => None,
        }
    }
}
