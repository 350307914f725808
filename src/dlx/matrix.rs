#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The sparse boolean matrix that Algorithm X dances on.
//!
//! Every `1` of the matrix is a [`Node`] that sits in two circular doubly
//! linked lists at once: the vertical list of its column and the horizontal
//! list of its row. Column headers are nodes too; they act as the sentinel of
//! their vertical list and are themselves linked into the horizontal list of
//! active columns, whose sentinel is the [`ROOT`] node.
//!
//! Nodes live in a single arena and refer to each other by [`NodeIndex`].
//! The arena layout is fixed at construction:
//!
//! - index `0` is the root,
//! - indices `1..=columns` are the column headers, in column order,
//! - every later index is a row node; the nodes of one row are contiguous.
//!
//! Covering a column rewires only the *neighbours* of the removed nodes. The
//! removed nodes keep their own links, so uncovering in the reverse order puts
//! every pointer back exactly where it was.

use itertools::Itertools;
use std::iter;
use std::ops::Index;
use thiserror::Error;

/// The position of a node in the arena of a [`Matrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Creates a new index.
    #[must_use]
    pub const fn new(ix: usize) -> Self {
        Self(ix)
    }

    /// Returns the index value as a primitive type.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// The sentinel of the horizontal list of active columns.
pub const ROOT: NodeIndex = NodeIndex(0);

/// One occurrence of a row intersecting a column.
///
/// Headers and the root are nodes as well. A header's `column` and `first`
/// point to itself; the root's point to [`ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    up: NodeIndex,
    down: NodeIndex,
    left: NodeIndex,
    right: NodeIndex,
    /// The header of the column this node belongs to.
    column: NodeIndex,
    /// The first node of this node's row. Used to recover which row a
    /// solution node stands for.
    first: NodeIndex,
}

impl Node {
    /// The node above this one in its column.
    #[must_use]
    pub const fn up(&self) -> NodeIndex {
        self.up
    }

    /// The node below this one in its column.
    #[must_use]
    pub const fn down(&self) -> NodeIndex {
        self.down
    }

    /// The node to the left of this one in its row.
    #[must_use]
    pub const fn left(&self) -> NodeIndex {
        self.left
    }

    /// The node to the right of this one in its row.
    #[must_use]
    pub const fn right(&self) -> NodeIndex {
        self.right
    }

    /// The header of the column this node belongs to.
    #[must_use]
    pub const fn column(&self) -> NodeIndex {
        self.column
    }

    /// The first node of this node's row.
    #[must_use]
    pub const fn first(&self) -> NodeIndex {
        self.first
    }
}

/// The bookkeeping a column header carries on top of its [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    size: usize,
    name: usize,
}

impl Header {
    /// The number of nodes currently linked into the column's vertical list.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The column index, `0..columns`. Never used for ordering decisions.
    #[must_use]
    pub const fn name(&self) -> usize {
        self.name
    }
}

/// Which way [`Matrix::dance`] walks the structure.
///
/// Covering walks down the column and right along each row; uncovering must
/// undo those steps in exactly the opposite order, so it walks up and left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Down and right; unlinks nodes.
    Forward,
    /// Up and left; relinks nodes.
    Reverse,
}

/// A broken identity found by [`Matrix::check_links`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// `node.right.left` or `node.left.right` is not `node`.
    #[error("horizontal links around node {node} are inconsistent")]
    Horizontal {
        /// The offending node.
        node: usize,
    },
    /// `node.down.up` or `node.up.down` is not `node`.
    #[error("vertical links around node {node} are inconsistent")]
    Vertical {
        /// The offending node.
        node: usize,
    },
    /// A node is linked into the vertical list of a column it does not belong to.
    #[error("node {node} sits in column {found} but belongs to column {expected}")]
    Column {
        /// The offending node.
        node: usize,
        /// The column the node's back reference names.
        expected: usize,
        /// The column whose list the node was found in.
        found: usize,
    },
    /// A header's size disagrees with the length of its vertical list.
    #[error("column {column} records size {expected} but holds {found} nodes")]
    Size {
        /// The column index.
        column: usize,
        /// The recorded size.
        expected: usize,
        /// The number of nodes reachable from the header.
        found: usize,
    },
}

/// A sparse boolean matrix in dancing-links form.
///
/// Two matrices compare equal when every node has the same links, so tests
/// can check that a sequence of covers and uncovers restores the structure
/// node for node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    nodes: Vec<Node>,
    headers: Vec<Header>,
    /// The first node of every row, in insertion order. Strictly increasing.
    row_starts: Vec<NodeIndex>,
}

impl Index<NodeIndex> for Matrix {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl Matrix {
    /// Creates a matrix with `columns` empty columns, all of them active.
    #[must_use]
    pub fn new(columns: usize) -> Self {
        let nodes = (0..=columns)
            .map(|ix| {
                let this = NodeIndex(ix);
                Node {
                    up: this,
                    down: this,
                    left: NodeIndex(if ix == 0 { columns } else { ix - 1 }),
                    right: NodeIndex(if ix == columns { 0 } else { ix + 1 }),
                    column: this,
                    first: this,
                }
            })
            .collect();
        let headers = (0..columns).map(|name| Header { size: 0, name }).collect();

        Self {
            nodes,
            headers,
            row_starts: Vec::new(),
        }
    }

    /// Appends a row covering the given columns and returns its identity,
    /// which counts rows from zero in insertion order.
    ///
    /// The nodes are linked left to right in the order given and each one is
    /// placed at the bottom of its column. An empty row is ignored and gets no
    /// identity.
    ///
    /// Column indices are trusted: they must be below [`Self::columns`] and
    /// distinct within the row. Validate untrusted input with
    /// [`Problem`](crate::dlx::problem::Problem) first.
    pub fn add_row(&mut self, columns: &[usize]) -> Option<usize> {
        if columns.is_empty() {
            return None;
        }
        debug_assert!(
            columns.iter().all(|&c| c < self.headers.len()),
            "column index out of range"
        );
        debug_assert!(columns.iter().all_unique(), "duplicate column in row");

        let first = NodeIndex(self.nodes.len());
        let len = columns.len();
        self.nodes.reserve(len);

        for (offset, &column) in columns.iter().enumerate() {
            let this = NodeIndex(first.0 + offset);
            let header = Self::header(column);
            let last = self[header].up;

            self.nodes.push(Node {
                up: last,
                down: header,
                left: NodeIndex(first.0 + (offset + len - 1) % len),
                right: NodeIndex(first.0 + (offset + 1) % len),
                column: header,
                first,
            });
            self.node_mut(last).down = this;
            self.node_mut(header).up = this;
            self.headers[column].size += 1;
        }

        self.row_starts.push(first);
        Some(self.row_starts.len() - 1)
    }

    /// Returns the header node of a column.
    #[must_use]
    pub const fn header(column: usize) -> NodeIndex {
        NodeIndex(column + 1)
    }

    /// The number of columns the matrix was created with.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.headers.len()
    }

    /// The number of non-empty rows added so far.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.row_starts.len()
    }

    /// The number of `1`s in the matrix.
    #[must_use]
    pub fn nodes(&self) -> usize {
        self.nodes.len() - self.headers.len() - 1
    }

    /// The bookkeeping record of a column.
    #[must_use]
    pub fn column_header(&self, column: usize) -> &Header {
        &self.headers[column]
    }

    /// The number of rows currently linked into a column.
    #[must_use]
    pub fn size(&self, column: usize) -> usize {
        self.headers[column].size
    }

    /// Returns `true` if the column is linked into the root's list.
    #[must_use]
    pub fn is_active(&self, column: usize) -> bool {
        let header = Self::header(column);
        self[self[header].left].right == header
    }

    /// Returns `true` once every column has been covered.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self[ROOT].right == ROOT
    }

    /// The active columns, left to right from the root.
    pub fn active_columns(&self) -> impl Iterator<Item = usize> + '_ {
        iter::successors(Some(self[ROOT].right), move |&ix| Some(self[ix].right))
            .take_while(|&ix| ix != ROOT)
            .map(|ix| ix.0 - 1)
    }

    /// The first node of a row.
    #[must_use]
    pub fn row_start(&self, row: usize) -> NodeIndex {
        self.row_starts[row]
    }

    /// Maps any node of a row back to the row's identity. Returns `None` for
    /// the root and the headers.
    #[must_use]
    pub fn row_of(&self, node: NodeIndex) -> Option<usize> {
        self.row_starts.binary_search(&self[node].first).ok()
    }

    /// The columns of a row, in the order they were given to
    /// [`Self::add_row`].
    ///
    /// Horizontal row links are never rewired, so this also works on a matrix
    /// left covered by a successful search.
    pub fn row_columns(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        let first = self.row_starts[row];
        iter::successors(Some(first), move |&ix| {
            Some(self[ix].right).filter(|&next| next != first)
        })
        .map(|ix| self[ix].column.0 - 1)
    }

    /// The rows currently linked into a column, top to bottom.
    pub fn column_rows(&self, column: usize) -> impl Iterator<Item = usize> + '_ {
        let header = Self::header(column);
        iter::successors(Some(self[header].down), move |&ix| Some(self[ix].down))
            .take_while(move |&ix| ix != header)
            .filter_map(|ix| self.row_of(ix))
    }

    /// Covers a column: removes it from the active list and hides every row
    /// that intersects it from all the other columns.
    ///
    /// Returns the number of nodes unlinked from other columns.
    pub fn cover(&mut self, column: usize) -> usize {
        self.dance(Self::header(column), Direction::Forward)
    }

    /// Undoes [`Self::cover`]. Covers and uncovers must nest: the most recently
    /// covered column is the first to be uncovered.
    pub fn uncover(&mut self, column: usize) {
        self.dance(Self::header(column), Direction::Reverse);
    }

    /// Covers or uncovers the column headed by `header`.
    ///
    /// The column's own vertical list is left intact in both directions; it is
    /// what the search walks to enumerate candidate rows.
    pub(crate) fn dance(&mut self, header: NodeIndex, direction: Direction) -> usize {
        let mut updates = 0;
        if direction == Direction::Forward {
            self.unlink_horizontal(header);
        }

        let mut row = self.vertical_step(header, direction);
        while row != header {
            let mut node = self.horizontal_step(row, direction);
            while node != row {
                let column = self[node].column.0 - 1;
                match direction {
                    Direction::Forward => {
                        self.unlink_vertical(node);
                        self.headers[column].size -= 1;
                    }
                    Direction::Reverse => {
                        self.headers[column].size += 1;
                        self.relink_vertical(node);
                    }
                }
                updates += 1;
                node = self.horizontal_step(node, direction);
            }
            row = self.vertical_step(row, direction);
        }

        if direction == Direction::Reverse {
            self.relink_horizontal(header);
        }
        updates
    }

    fn vertical_step(&self, ix: NodeIndex, direction: Direction) -> NodeIndex {
        match direction {
            Direction::Forward => self[ix].down,
            Direction::Reverse => self[ix].up,
        }
    }

    fn horizontal_step(&self, ix: NodeIndex, direction: Direction) -> NodeIndex {
        match direction {
            Direction::Forward => self[ix].right,
            Direction::Reverse => self[ix].left,
        }
    }

    fn node_mut(&mut self, ix: NodeIndex) -> &mut Node {
        &mut self.nodes[ix.0]
    }

    fn unlink_horizontal(&mut self, ix: NodeIndex) {
        let Node { left, right, .. } = self[ix];
        self.node_mut(left).right = right;
        self.node_mut(right).left = left;
    }

    fn relink_horizontal(&mut self, ix: NodeIndex) {
        let Node { left, right, .. } = self[ix];
        self.node_mut(left).right = ix;
        self.node_mut(right).left = ix;
    }

    fn unlink_vertical(&mut self, ix: NodeIndex) {
        let Node { up, down, .. } = self[ix];
        self.node_mut(up).down = down;
        self.node_mut(down).up = up;
    }

    fn relink_vertical(&mut self, ix: NodeIndex) {
        let Node { up, down, .. } = self[ix];
        self.node_mut(up).down = ix;
        self.node_mut(down).up = ix;
    }

    /// Checks the link identities of every reachable node.
    ///
    /// - the root list: `right.left == node` and `left.right == node`;
    /// - every column list, covered or not: `down.up == node`,
    ///   `up.down == node`, the node's column is that column and the list is
    ///   as long as the header's size;
    /// - every row: `right.left == node` and `left.right == node`.
    ///
    /// Nodes hidden by a cover are skipped by the column walk, so the check
    /// holds in the middle of a search as well as before and after it.
    ///
    /// # Errors
    ///
    /// Returns the first broken identity found.
    pub fn check_links(&self) -> Result<(), LinkError> {
        let horizontal_ok =
            |ix: NodeIndex| self[self[ix].right].left == ix && self[self[ix].left].right == ix;
        let vertical_ok =
            |ix: NodeIndex| self[self[ix].down].up == ix && self[self[ix].up].down == ix;

        let mut ix = ROOT;
        loop {
            if !horizontal_ok(ix) {
                return Err(LinkError::Horizontal { node: ix.0 });
            }
            ix = self[ix].right;
            if ix == ROOT {
                break;
            }
        }

        for (column, header) in self.headers.iter().enumerate() {
            let head = Self::header(column);
            if !vertical_ok(head) {
                return Err(LinkError::Vertical { node: head.0 });
            }
            let mut found = 0;
            let mut ix = self[head].down;
            while ix != head {
                if !vertical_ok(ix) {
                    return Err(LinkError::Vertical { node: ix.0 });
                }
                if self[ix].column != head {
                    return Err(LinkError::Column {
                        node: ix.0,
                        expected: self[ix].column.0.wrapping_sub(1),
                        found: column,
                    });
                }
                found += 1;
                ix = self[ix].down;
            }
            if found != header.size {
                return Err(LinkError::Size {
                    column,
                    expected: header.size,
                    found,
                });
            }
        }

        let first_row_node = self.headers.len() + 1;
        (first_row_node..self.nodes.len())
            .map(NodeIndex)
            .find(|&ix| !horizontal_ok(ix))
            .map_or(Ok(()), |ix| Err(LinkError::Horizontal { node: ix.0 }))
    }
}
