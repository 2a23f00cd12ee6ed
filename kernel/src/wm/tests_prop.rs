#![cfg(test)]

use alloc::vec::Vec;

use proptest::prelude::*;

use super::WindowRegistry;
use crate::config::QarmaConfig;
use crate::window::{WindowFactory, WindowFlags, WindowGeometry, WindowId, WindowKind};

#[derive(Debug, Clone)]
enum Op {
    Add,
    /// Remove the n-th id ever handed out, live or not
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![3 => Just(Op::Add), 2 => (0usize..40).prop_map(Op::Remove)]
}

proptest! {
    #[test]
    fn registry_tracks_a_model_list(capacity in 1usize..12, ops in prop::collection::vec(op(), 0..60)) {
        let mut factory = WindowFactory::new(&QarmaConfig::default());
        let mut reg = WindowRegistry::new(capacity);
        let mut model: Vec<WindowId> = Vec::new();
        let mut issued: Vec<WindowId> = Vec::new();

        for op in ops {
            match op {
                Op::Add => {
                    let window = factory
                        .create_at(WindowKind::Generic, "p", WindowGeometry::new(0, 0, 1, 1), WindowFlags::VISIBLE)
                        .unwrap();
                    let id = window.id();
                    issued.push(id);
                    match reg.add(window) {
                        Ok(got) => {
                            prop_assert!(model.len() < capacity);
                            prop_assert_eq!(got, id);
                            model.push(id);
                        }
                        Err((_, back)) => {
                            prop_assert_eq!(model.len(), capacity);
                            prop_assert_eq!(back.id(), id);
                        }
                    }
                }
                Op::Remove(n) => {
                    let Some(&id) = issued.get(n) else { continue };
                    let live = model.iter().position(|&m| m == id);
                    match (reg.remove(id), live) {
                        (Ok(w), Some(i)) => {
                            prop_assert_eq!(w.id(), id);
                            model.remove(i);
                        }
                        (Err(_), None) => {}
                        (res, live) => prop_assert!(false, "remove {:?}: {:?} vs model {:?}", id, res.map(|w| w.id()), live),
                    }
                }
            }

            prop_assert!(reg.len() <= capacity);
            prop_assert_eq!(reg.ids().collect::<Vec<_>>(), model.clone());
        }
    }
}
