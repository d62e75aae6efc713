//! Lazy multi-store intersection views.
//!
//! A [`View`] (mutable) or [`ConstView`] (read-only) is a transient cursor
//! over the current state of 1..=4 component stores. Iterating yields one
//! `(Entity, component references...)` tuple per entity present in *all*
//! participating stores. The references point directly into live storage —
//! nothing is copied, and writes through a mutable view are visible
//! immediately.
//!
//! ## Baseline selection
//!
//! The intersection is always a subset of the smallest participating store's
//! entity set, so at construction the store with the fewest entries is picked
//! as the **baseline**. Iteration walks the baseline's dense entity slice in
//! index order and filters each candidate with one O(1) lookup probe per
//! remaining store. Result order is therefore the baseline's current dense
//! order — insertion order modulo swap-erasures — and carries no relationship
//! to entity numeric values.
//!
//! ## Iteration vs. mutation
//!
//! A view borrows every participating store for its whole lifetime (mutably
//! for [`View`], shared for [`ConstView`]), so the borrow checker rejects any
//! structural mutation — `create`, `remove`, `clear` — while the view is
//! alive. The swap-erase hazards this would otherwise cause cannot occur.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::component::Component;
use crate::entity::Entity;
use crate::store::ComponentStore;

/// A read-write view over the intersection of component stores.
///
/// Construct with a tuple of mutable store borrows and iterate:
///
/// ```rust
/// # use cinder_ecs::{Component, ComponentStore, Entity, View};
/// # #[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
/// # struct Pos { x: f32 }
/// # impl Component for Pos { fn type_name() -> &'static str { "Pos" } }
/// # #[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
/// # struct Vel { dx: f32 }
/// # impl Component for Vel { fn type_name() -> &'static str { "Vel" } }
/// # let mut positions = ComponentStore::<Pos>::new();
/// # let mut velocities = ComponentStore::<Vel>::new();
/// # let e = Entity::from_raw(1);
/// # positions.create(e);
/// # velocities.create(e);
/// for (_entity, pos, vel) in
///     View::<(&mut ComponentStore<Pos>, &mut ComponentStore<Vel>)>::new((
///         &mut positions,
///         &mut velocities,
///     ))
/// {
///     pos.x += vel.dx;
/// }
/// ```
pub struct View<S> {
    stores: S,
}

/// The read-only counterpart of [`View`]: yields shared component references,
/// so the type system rejects writes through them.
pub struct ConstView<S> {
    stores: S,
}

/// Picks the shortest of the candidate dense entity slices.
fn shortest<'a>(candidates: &[&'a [Entity]]) -> &'a [Entity] {
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.len() < best.len() {
            best = candidate;
        }
    }
    best
}

macro_rules! impl_view {
    ($iter:ident, $const_iter:ident; $(($T:ident, $idx:tt)),+) => {
        impl<'a, $($T: Component),+> View<($(&'a mut ComponentStore<$T>,)+)> {
            /// Build a view over the given stores. The baseline is chosen
            /// here, from the stores' current counts.
            pub fn new(stores: ($(&'a mut ComponentStore<$T>,)+)) -> Self {
                Self { stores }
            }
        }

        impl<'a, $($T: Component),+> IntoIterator for View<($(&'a mut ComponentStore<$T>,)+)> {
            type Item = (Entity, $(&'a mut $T,)+);
            type IntoIter = $iter<'a, $($T),+>;

            #[allow(non_snake_case)]
            fn into_iter(self) -> Self::IntoIter {
                let ($($T,)+) = self.stores;
                let parts = ($(ComponentStore::view_parts_mut($T),)+);
                let baseline = shortest(&[$(parts.$idx.0),+]);
                $iter {
                    baseline,
                    cursor: 0,
                    stores: ($((parts.$idx.1, parts.$idx.2),)+),
                    _marker: PhantomData,
                }
            }
        }

        /// Mutable intersection iterator. Holds each store's reverse lookup
        /// plus a raw pointer to its component buffer; the stores stay
        /// mutably borrowed for `'a` through the iterator itself.
        pub struct $iter<'a, $($T: Component),+> {
            baseline: &'a [Entity],
            cursor: usize,
            stores: ($((&'a HashMap<Entity, usize>, *mut $T),)+),
            _marker: PhantomData<($(&'a mut $T,)+)>,
        }

        impl<'a, $($T: Component),+> Iterator for $iter<'a, $($T),+> {
            type Item = (Entity, $(&'a mut $T,)+);

            fn next(&mut self) -> Option<Self::Item> {
                while self.cursor < self.baseline.len() {
                    let entity = self.baseline[self.cursor];
                    self.cursor += 1;
                    let indices = ($(
                        match self.stores.$idx.0.get(&entity) {
                            Some(&index) => index,
                            None => continue,
                        },
                    )+);
                    // SAFETY: each dense index is owned by exactly one entity
                    // (the lookup is injective) and each baseline entity is
                    // visited at most once, so every `&mut` handed out points
                    // at a distinct element. The buffers cannot move or
                    // shrink while the stores are borrowed for 'a.
                    return Some((entity, $(unsafe { &mut *self.stores.$idx.1.add(indices.$idx) },)+));
                }
                None
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                (0, Some(self.baseline.len() - self.cursor))
            }
        }

        impl<'a, $($T: Component),+> ConstView<($(&'a ComponentStore<$T>,)+)> {
            /// Build a read-only view over the given stores.
            pub fn new(stores: ($(&'a ComponentStore<$T>,)+)) -> Self {
                Self { stores }
            }
        }

        impl<'a, $($T: Component),+> IntoIterator for ConstView<($(&'a ComponentStore<$T>,)+)> {
            type Item = (Entity, $(&'a $T,)+);
            type IntoIter = $const_iter<'a, $($T),+>;

            fn into_iter(self) -> Self::IntoIter {
                let baseline = shortest(&[$(self.stores.$idx.entities()),+]);
                $const_iter {
                    baseline,
                    cursor: 0,
                    stores: self.stores,
                }
            }
        }

        /// Read-only intersection iterator.
        pub struct $const_iter<'a, $($T: Component),+> {
            baseline: &'a [Entity],
            cursor: usize,
            stores: ($(&'a ComponentStore<$T>,)+),
        }

        impl<'a, $($T: Component),+> Iterator for $const_iter<'a, $($T),+> {
            type Item = (Entity, $(&'a $T,)+);

            fn next(&mut self) -> Option<Self::Item> {
                while self.cursor < self.baseline.len() {
                    let entity = self.baseline[self.cursor];
                    self.cursor += 1;
                    let indices = ($(
                        match self.stores.$idx.find_index(entity) {
                            Some(index) => index,
                            None => continue,
                        },
                    )+);
                    return Some((entity, $(self.stores.$idx.component_at(indices.$idx),)+));
                }
                None
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                (0, Some(self.baseline.len() - self.cursor))
            }
        }
    };
}

impl_view!(ViewIter1, ConstViewIter1; (A, 0));
impl_view!(ViewIter2, ConstViewIter2; (A, 0), (B, 1));
impl_view!(ViewIter3, ConstViewIter3; (A, 0), (B, 1), (C, 2));
impl_view!(ViewIter4, ConstViewIter4; (A, 0), (B, 1), (C, 2), (D, 3));

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
    struct C1 {
        a: i32,
    }

    #[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
    struct C2 {
        b: f32,
    }

    #[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
    struct C3 {
        c: i32,
    }

    impl Component for C1 {
        fn type_name() -> &'static str {
            "C1"
        }
    }
    impl Component for C2 {
        fn type_name() -> &'static str {
            "C2"
        }
    }
    impl Component for C3 {
        fn type_name() -> &'static str {
            "C3"
        }
    }

    fn e(id: u32) -> Entity {
        Entity::from_raw(id)
    }

    fn add_c1(store: &mut ComponentStore<C1>, id: u32, a: i32) {
        store.create(e(id)).a = a;
    }

    fn add_c2(store: &mut ComponentStore<C2>, id: u32, b: f32) {
        store.create(e(id)).b = b;
    }

    #[test]
    fn test_single_store_view() {
        let mut m1 = ComponentStore::<C1>::new();
        add_c1(&mut m1, 1, 10);
        add_c1(&mut m1, 2, 20);
        add_c1(&mut m1, 3, 30);
        add_c1(&mut m1, 5, 50);

        // Mutate through the view to verify the references are live.
        for (_, c1) in View::<(&mut ComponentStore<C1>,)>::new((&mut m1,)) {
            c1.a += 1;
        }

        assert_eq!(m1.get(e(1)).unwrap().a, 11);
        assert_eq!(m1.get(e(2)).unwrap().a, 21);
        assert_eq!(m1.get(e(3)).unwrap().a, 31);
        assert_eq!(m1.get(e(5)).unwrap().a, 51);
    }

    #[test]
    fn test_single_store_view_yields_dense_order() {
        let mut m1 = ComponentStore::<C1>::new();
        add_c1(&mut m1, 3, 3);
        add_c1(&mut m1, 1, 1);
        add_c1(&mut m1, 2, 2);

        let yielded: Vec<Entity> = View::<(&mut ComponentStore<C1>,)>::new((&mut m1,))
            .into_iter()
            .map(|(en, _)| en)
            .collect();
        assert_eq!(yielded, m1.entities());
    }

    #[test]
    fn test_intersection_two_stores() {
        let mut m1 = ComponentStore::<C1>::new();
        add_c1(&mut m1, 1, 10);
        add_c1(&mut m1, 2, 20);
        add_c1(&mut m1, 3, 30);
        add_c1(&mut m1, 5, 50);

        let mut m2 = ComponentStore::<C2>::new();
        add_c2(&mut m2, 2, 2.0);
        add_c2(&mut m2, 3, 3.0);
        add_c2(&mut m2, 4, 4.0);

        // Intersection {2, 3}; m2 is smaller so it drives the scan.
        let mut got = Vec::new();
        for (entity, c1, c2) in
            View::<(&mut ComponentStore<C1>, &mut ComponentStore<C2>)>::new((&mut m1, &mut m2))
        {
            got.push((entity, c1.a, c2.b));
            c1.a += 1;
            c2.b += 0.5;
        }

        assert_eq!(got.len(), 2);
        assert_eq!(got[0], (e(2), 20, 2.0));
        assert_eq!(got[1], (e(3), 30, 3.0));

        // Mutations landed in both stores.
        assert_eq!(m1.get(e(2)).unwrap().a, 21);
        assert_eq!(m2.get(e(2)).unwrap().b, 2.5);
        assert_eq!(m1.get(e(3)).unwrap().a, 31);
        assert_eq!(m2.get(e(3)).unwrap().b, 3.5);

        // Non-intersecting entries untouched.
        assert_eq!(m1.get(e(1)).unwrap().a, 10);
        assert_eq!(m2.get(e(4)).unwrap().b, 4.0);
    }

    #[test]
    fn test_intersection_three_stores() {
        let mut m1 = ComponentStore::<C1>::new();
        add_c1(&mut m1, 10, 1);
        add_c1(&mut m1, 11, 2);
        add_c1(&mut m1, 12, 3);

        let mut m2 = ComponentStore::<C2>::new();
        add_c2(&mut m2, 11, 1.1);
        add_c2(&mut m2, 12, 1.2);
        add_c2(&mut m2, 13, 1.3);

        let mut m3 = ComponentStore::<C3>::new();
        m3.create(e(12)).c = 42;
        m3.create(e(14)).c = 99;

        let got: Vec<(Entity, i32, f32, i32)> = View::<(
            &mut ComponentStore<C1>,
            &mut ComponentStore<C2>,
            &mut ComponentStore<C3>,
        )>::new((&mut m1, &mut m2, &mut m3))
            .into_iter()
            .map(|(entity, c1, c2, c3)| (entity, c1.a, c2.b, c3.c))
            .collect();

        assert_eq!(got, vec![(e(12), 3, 1.2, 42)]);
    }

    #[test]
    fn test_empty_intersection() {
        let mut m1 = ComponentStore::<C1>::new();
        add_c1(&mut m1, 1, 0);
        add_c1(&mut m1, 2, 0);

        let mut m2 = ComponentStore::<C2>::new();
        add_c2(&mut m2, 3, 0.0);
        add_c2(&mut m2, 4, 0.0);

        let count = View::<(&mut ComponentStore<C1>, &mut ComponentStore<C2>)>::new((
            &mut m1, &mut m2,
        ))
        .into_iter()
        .count();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_baseline_is_smallest_store() {
        let mut m1 = ComponentStore::<C1>::new();
        for id in 1..=5 {
            add_c1(&mut m1, id, id as i32);
        }

        let mut m2 = ComponentStore::<C2>::new();
        add_c2(&mut m2, 2, 2.0);
        add_c2(&mut m2, 4, 4.0);

        // Yield order follows the smaller store's dense order, proving it
        // was selected as the baseline.
        let got: Vec<Entity> =
            View::<(&mut ComponentStore<C1>, &mut ComponentStore<C2>)>::new((&mut m1, &mut m2))
                .into_iter()
                .map(|(entity, _, _)| entity)
                .collect();
        assert_eq!(got, vec![e(2), e(4)]);
    }

    #[test]
    fn test_const_view_reads_intersection() {
        let mut m1 = ComponentStore::<C1>::new();
        add_c1(&mut m1, 1, 5);
        let mut m2 = ComponentStore::<C2>::new();
        add_c2(&mut m2, 1, 7.0);

        // Item type is (Entity, &C1, &C2) — writes through the references
        // do not type-check.
        let got: Vec<(Entity, i32, f32)> =
            ConstView::<(&ComponentStore<C1>, &ComponentStore<C2>)>::new((&m1, &m2))
            .into_iter()
            .map(|(entity, c1, c2)| (entity, c1.a, c2.b))
            .collect();
        assert_eq!(got, vec![(e(1), 5, 7.0)]);
    }

    #[test]
    fn test_const_view_allows_concurrent_shared_borrows() {
        let mut m1 = ComponentStore::<C1>::new();
        add_c1(&mut m1, 1, 5);

        // Two const views over the same store may coexist.
        let v1 = ConstView::<(&ComponentStore<C1>,)>::new((&m1,));
        let v2 = ConstView::<(&ComponentStore<C1>,)>::new((&m1,));
        assert_eq!(v1.into_iter().count(), 1);
        assert_eq!(v2.into_iter().count(), 1);
    }

    #[test]
    fn test_view_after_swap_erase() {
        let mut m1 = ComponentStore::<C1>::new();
        for id in [1, 2, 3, 5] {
            add_c1(&mut m1, id, id as i32 * 10);
        }
        let mut m2 = ComponentStore::<C2>::new();
        for id in [1, 2, 3, 5] {
            add_c2(&mut m2, id, id as f32);
        }
        m1.remove(e(2));

        let mut got: Vec<u32> =
            View::<(&mut ComponentStore<C1>, &mut ComponentStore<C2>)>::new((&mut m1, &mut m2))
            .into_iter()
            .map(|(entity, _, _)| entity.id())
            .collect();
        got.sort_unstable();
        assert_eq!(got, vec![1, 3, 5]);
    }

    #[test]
    fn test_four_store_intersection() {
        let mut m1 = ComponentStore::<C1>::new();
        let mut m2 = ComponentStore::<C2>::new();
        let mut m3 = ComponentStore::<C3>::new();
        let mut m4 = ComponentStore::<C1>::new();

        for id in [1, 2] {
            add_c1(&mut m1, id, 0);
            add_c2(&mut m2, id, 0.0);
        }
        m3.create(e(2));
        m4.create(e(2));
        m4.create(e(3));

        let got: Vec<Entity> = View::<(
            &mut ComponentStore<C1>,
            &mut ComponentStore<C2>,
            &mut ComponentStore<C3>,
            &mut ComponentStore<C1>,
        )>::new((&mut m1, &mut m2, &mut m3, &mut m4))
            .into_iter()
            .map(|(entity, _, _, _, _)| entity)
            .collect();
        assert_eq!(got, vec![e(2)]);
    }
}
