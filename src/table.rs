//! Per-type operation tables.
//!
//! Every type stored in a given container configuration gets exactly one [`Table`], built on
//! first use and shared for the rest of the process by every container holding that type.

use std::alloc::Layout;
use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::mem;

use log::trace;
use parking_lot::RwLock;

use crate::error::Error;
use crate::features::{Admits, Features};
use crate::space::{Buffer, Storage};
use crate::type_name::type_name;

/// Storage of a container with capacity `N` and features `F`.
pub(crate) type Buf<const N: usize, F> = Buffer<N, <F as Features>::Space>;

type CloneFn<S> = unsafe fn(&mut S, &S) -> Result<(), Error>;

/// Operations and facts about one stored type, for one container configuration.
pub struct Table<const N: usize, F: Features> {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) layout: Layout,
    pub(crate) inplace: bool,
    pub(crate) cloneable: bool,
    pub(crate) destroy: unsafe fn(&mut Buf<N, F>),
    pub(crate) delete: unsafe fn(&mut Buf<N, F>),
    pub(crate) clone: CloneFn<Buf<N, F>>,
    pub(crate) relocate: unsafe fn(&mut Buf<N, F>, &mut Buf<N, F>),
    pub(crate) assign_clone: CloneFn<Buf<N, F>>,
    pub(crate) assign_move: unsafe fn(&mut Buf<N, F>, *const ()),
    pub(crate) features: F::Slots<Buf<N, F>>,
}

impl<const N: usize, F: Features> Table<N, F> {
    /// Returns the table for `T`, building it if this is the first use.
    pub(crate) fn of<T: 'static, C: Cloning<T>>() -> &'static Self
    where
        F: Admits<T>,
    {
        memoize::<(T, C, Self), Self>(Self::build::<T, C>)
    }

    fn build<T: 'static, C: Cloning<T>>() -> Self
    where
        F: Admits<T>,
    {
        let table = Table {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            layout: Layout::new::<T>(),
            inplace: Buf::<N, F>::is_inplace::<T>(),
            cloneable: <C as Cloning<T>>::CLONEABLE,
            destroy: destroy::<T, Buf<N, F>>,
            delete: delete::<T, Buf<N, F>>,
            clone: <C as Cloning<T>>::clone_slot::<Buf<N, F>>(),
            relocate: relocate::<T, Buf<N, F>>,
            assign_clone: <C as Cloning<T>>::assign_clone_slot::<Buf<N, F>>(),
            assign_move: assign_move::<T, Buf<N, F>>,
            features: <F as Admits<T>>::slots::<Buf<N, F>>(),
        };
        trace!(
            "built operation table for `{}` in capacity {}: {} bytes, inplace {}, cloneable {}",
            table.type_name,
            Buf::<N, F>::CAPACITY,
            table.layout.size(),
            table.inplace,
            table.cloneable,
        );
        table
    }

    /// Identity of the described type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Display name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Size of the described type, in bytes.
    pub fn value_size(&self) -> usize {
        self.layout.size()
    }

    /// Layout of the described type.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Whether values of the described type are stored inline.
    pub fn inplace(&self) -> bool {
        self.inplace
    }

    /// Whether values of the described type can be cloned through this table.
    pub fn cloneable(&self) -> bool {
        self.cloneable
    }
}

impl<const N: usize, F: Features> fmt::Debug for Table<N, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Table")
            .field("container", &type_name::<crate::SmallAny<N, F>>())
            .field("type_name", &self.type_name)
            .field("type_id", &self.type_id)
            .field("value_size", &self.layout.size())
            .field("inplace", &self.inplace)
            .field("cloneable", &self.cloneable)
            .finish()
    }
}

/// How a stored type is duplicated.
pub(crate) trait Cloning<T>: 'static {
    const CLONEABLE: bool;

    fn clone_slot<S: Storage>() -> CloneFn<S>;

    fn assign_clone_slot<S: Storage>() -> CloneFn<S>;
}

/// Values stored with `T: Clone`.
pub(crate) enum Cloneable {}

/// Values stored without `Clone`; cloning them reports an error.
pub(crate) enum Unique {}

impl<T: Clone + 'static> Cloning<T> for Cloneable {
    const CLONEABLE: bool = true;

    fn clone_slot<S: Storage>() -> CloneFn<S> {
        clone::<T, S>
    }

    fn assign_clone_slot<S: Storage>() -> CloneFn<S> {
        assign_clone::<T, S>
    }
}

impl<T: 'static> Cloning<T> for Unique {
    const CLONEABLE: bool = false;

    fn clone_slot<S: Storage>() -> CloneFn<S> {
        refuse_clone::<T, S>
    }

    fn assign_clone_slot<S: Storage>() -> CloneFn<S> {
        refuse_clone::<T, S>
    }
}

unsafe fn destroy<T, S: Storage>(storage: &mut S) {
    storage.drop_value::<T>();
}

unsafe fn delete<T, S: Storage>(storage: &mut S) {
    storage.delete::<T>();
}

unsafe fn clone<T: Clone, S: Storage>(dst: &mut S, src: &S) -> Result<(), Error> {
    dst.put(src.get::<T>().clone());
    Ok(())
}

unsafe fn refuse_clone<T, S: Storage>(_dst: &mut S, _src: &S) -> Result<(), Error> {
    Err(Error::NotCloneable {
        type_name: type_name::<T>(),
    })
}

unsafe fn relocate<T, S: Storage>(dst: &mut S, src: &mut S) {
    dst.relocate::<T>(src);
}

unsafe fn assign_clone<T: Clone, S: Storage>(dst: &mut S, src: &S) -> Result<(), Error> {
    dst.get_mut::<T>().clone_from(src.get::<T>());
    Ok(())
}

unsafe fn assign_move<T, S: Storage>(dst: &mut S, src: *const ()) {
    *dst.get_mut::<T>() = src.cast::<T>().read();
}

type Registry = BTreeMap<TypeId, &'static (dyn Any + Send + Sync)>;

static TABLES: RwLock<Registry> = RwLock::new(BTreeMap::new());

/// Returns the value registered under `K`, running `build` once to create it.
///
/// Concurrent first users of the same key block on the write lock; only the first one builds.
fn memoize<K: 'static, V: Send + Sync + 'static>(build: impl FnOnce() -> V) -> &'static V {
    #[cfg(test)]
    LOOKUPS.with(|lookups| lookups.set(lookups.get() + 1));
    let key = TypeId::of::<K>();
    if let Some(value) = lookup::<V>(&TABLES.read(), key) {
        return value;
    }

    let mut tables = TABLES.write();
    if let Some(value) = lookup::<V>(&tables, key) {
        return value;
    }
    let value: &'static V = Box::leak(Box::new(build()));
    tables.insert(key, value);
    value
}

fn lookup<V: 'static>(tables: &Registry, key: TypeId) -> Option<&'static V> {
    let entry: &'static (dyn Any + Send + Sync) = *tables.get(&key)?;
    entry.downcast_ref::<V>()
}

/// Number of tables built so far, across all configurations.
#[cfg(test)]
pub(crate) fn registered() -> usize {
    TABLES.read().len()
}

#[cfg(test)]
thread_local! {
    static LOOKUPS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Number of registry lookups made by the current thread.
#[cfg(test)]
pub(crate) fn lookups() -> usize {
    LOOKUPS.with(std::cell::Cell::get)
}

const _: () = assert!(mem::size_of::<Option<&'static Table<16, ()>>>() == mem::size_of::<usize>());
