//! Tree visualization of computations.
//!
//! Renders the instruction graph as an ASCII tree rooted at the computation's
//! root. Instructions reached twice are shown as back-references, and a WHILE
//! node expands into its init operand followed by the roots of its condition
//! and body.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashSet;
use std::io;
use std::rc::Rc;
use std::sync::Arc;

use ptree::{Style, TreeItem};

use crate::computation::Computation;
use crate::op::{InstrId, Op};
use crate::printer::format_instruction;

#[derive(Clone)]
struct InstrNode {
    computation: Arc<Computation>,
    id: InstrId,
    label: Option<&'static str>,
    visited: Rc<RefCell<HashSet<(usize, InstrId)>>>,
    is_backref: RefCell<bool>,
}

impl InstrNode {
    fn child(&self, computation: Arc<Computation>, id: InstrId, label: Option<&'static str>) -> Self {
        Self { computation, id, label, visited: self.visited.clone(), is_backref: RefCell::new(false) }
    }

    fn key(&self) -> (usize, InstrId) {
        (Arc::as_ptr(&self.computation) as usize, self.id)
    }
}

impl TreeItem for InstrNode {
    type Child = InstrNode;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &Style) -> io::Result<()> {
        if let Some(label) = self.label {
            write!(f, "{label} %{}: ", self.computation.name())?;
        }
        let Some(instr) = self.computation.instruction(self.id) else {
            return write!(f, "%{} (missing)", self.id);
        };
        if !self.visited.borrow_mut().insert(self.key()) {
            *self.is_backref.borrow_mut() = true;
            return write!(f, "%{} → (see above)", self.id);
        }
        write!(f, "{}", format_instruction(instr))
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        if *self.is_backref.borrow() {
            return Cow::Borrowed(&[]);
        }
        let Some(instr) = self.computation.instruction(self.id) else {
            return Cow::Borrowed(&[]);
        };
        let mut children: Vec<_> =
            instr.op.sources().iter().map(|&src| self.child(self.computation.clone(), src, None)).collect();
        if let Op::While { condition, body, .. } = &instr.op {
            children.push(self.child(condition.clone(), condition.root_id(), Some("condition")));
            children.push(self.child(body.clone(), body.root_id(), Some("body")));
        }
        Cow::Owned(children)
    }
}

impl Computation {
    /// Render the instruction graph as an ASCII tree.
    pub fn tree(&self) -> String {
        let root = InstrNode {
            computation: Arc::new(self.clone()),
            id: self.root_id(),
            label: None,
            visited: Rc::new(RefCell::new(HashSet::new())),
            is_backref: RefCell::new(false),
        };
        let mut buf = Vec::new();
        if let Err(err) = ptree::write_tree(&root, &mut buf) {
            return format!("<tree rendering failed: {err}>");
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
