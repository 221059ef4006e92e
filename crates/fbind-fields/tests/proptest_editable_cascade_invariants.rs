//! Property-based invariant tests for the editable cascade.
//!
//! A random tree of containers and fields receives a random sequence of
//! editable toggles. After every step:
//!
//! 1. Each component's effective flag equals the AND of its own local flag
//!    and every ancestor's local flag.
//! 2. Each field's local flag is exactly what was last set on it.
//! 3. Widget read-only state mirrors the field's effective flag.
//! 4. A child removed from its container no longer follows it.

use std::rc::Rc;

use fbind_fields::{Container, Field, FieldContext, MemoryInput, StringDatatype, TextField};
use proptest::prelude::*;

// ── Model ───────────────────────────────────────────────────────────────

struct Tree {
    containers: Vec<Container>,
    /// Parent index of each container (root has none).
    container_parent: Vec<Option<usize>>,
    container_local: Vec<bool>,
    fields: Vec<(MemoryInput<String>, TextField<String>)>,
    field_parent: Vec<usize>,
    field_local: Vec<bool>,
}

impl Tree {
    fn build(container_parents: &[usize], field_parents: &[usize]) -> Self {
        let cx = FieldContext::default();
        let mut containers = vec![Container::new()];
        let mut container_parent = vec![None];
        for (i, &p) in container_parents.iter().enumerate() {
            let parent = p % (i + 1);
            let child = Container::new();
            containers[parent].add(child.clone());
            containers.push(child);
            container_parent.push(Some(parent));
        }
        let mut fields = Vec::new();
        let mut field_parent = Vec::new();
        for &p in field_parents {
            let parent = p % containers.len();
            let input = MemoryInput::<String>::new();
            let field = Field::new(Rc::new(input.clone()), StringDatatype, cx.clone());
            containers[parent].add(field.clone());
            fields.push((input, field));
            field_parent.push(parent);
        }
        let container_local = vec![true; containers.len()];
        let field_local = vec![true; fields.len()];
        Self {
            containers,
            container_parent,
            container_local,
            fields,
            field_parent,
            field_local,
        }
    }

    fn expected_container(&self, mut index: usize) -> bool {
        loop {
            if !self.container_local[index] {
                return false;
            }
            match self.container_parent[index] {
                Some(parent) => index = parent,
                None => return true,
            }
        }
    }

    fn expected_field(&self, index: usize) -> bool {
        self.field_local[index] && self.expected_container(self.field_parent[index])
    }

    fn apply(&mut self, op: Op) {
        match op {
            Op::Container(i, editable) => {
                let i = i % self.containers.len();
                self.containers[i].set_editable(editable);
                self.container_local[i] = editable;
            }
            Op::Field(i, editable) => {
                if self.fields.is_empty() {
                    return;
                }
                let i = i % self.fields.len();
                self.fields[i].1.set_editable(editable);
                self.field_local[i] = editable;
            }
        }
    }

    fn check(&self) -> Result<(), TestCaseError> {
        for (i, container) in self.containers.iter().enumerate() {
            prop_assert_eq!(container.is_editable(), self.container_local[i]);
            prop_assert_eq!(container.is_editable_with_parent(), self.expected_container(i));
        }
        for (i, (input, field)) in self.fields.iter().enumerate() {
            prop_assert_eq!(field.is_editable(), self.field_local[i]);
            prop_assert_eq!(field.is_editable_with_parent(), self.expected_field(i));
            prop_assert_eq!(input.is_read_only(), !self.expected_field(i));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Container(usize, bool),
    Field(usize, bool),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), any::<bool>()).prop_map(|(i, e)| Op::Container(i, e)),
        (any::<usize>(), any::<bool>()).prop_map(|(i, e)| Op::Field(i, e)),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1–3. Effective flag, local flag and widget state after every toggle
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cascade_matches_model(
        container_parents in prop::collection::vec(any::<usize>(), 0..6),
        field_parents in prop::collection::vec(any::<usize>(), 0..10),
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut tree = Tree::build(&container_parents, &field_parents);
        tree.check()?;
        for op in ops {
            tree.apply(op);
            tree.check()?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Removal ends the cascade
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn removed_children_stop_following(
        count in 1usize..8,
        removed in prop::collection::vec(any::<bool>(), 8),
    ) {
        let parent = Container::new();
        let cx = FieldContext::default();
        let fields: Vec<TextField<String>> = (0..count)
            .map(|_| Field::new(Rc::new(MemoryInput::<String>::new()), StringDatatype, cx.clone()))
            .collect();
        for field in &fields {
            parent.add(field.clone());
        }
        for (field, &remove) in fields.iter().zip(&removed) {
            if remove {
                prop_assert!(parent.remove(field.id()));
            }
        }

        parent.set_editable(false);
        for (field, &remove) in fields.iter().zip(&removed) {
            prop_assert_eq!(field.is_editable_with_parent(), remove);
        }
        let kept = fields.iter().zip(&removed).filter(|(_, r)| !**r).count();
        prop_assert_eq!(parent.len(), kept);
    }
}
