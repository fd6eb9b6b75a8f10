// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zone capabilities: predicates, producers, and event callbacks.
//!
//! ## Overview
//!
//! A zone is anything implementing [`DropZone`]. Every method has a default, so a zone only
//! overrides what it cares about:
//!
//! - absent `can_accept` accepts every drag;
//! - absent `is_sticky` is never sticky;
//! - absent `data` produces an empty [`DataMap`];
//! - absent `effect` uses the engine's default effect;
//! - absent callbacks do nothing.
//!
//! [`ZoneDescriptor`] is a closure-based zone for hosts that prefer wiring callbacks inline.

use alloc::boxed::Box;

use crate::data::DataMap;
use crate::error::ZoneError;
use crate::types::{DragLocationHistory, DragPayload, DropEffect, Feedback, ResolvedRecord};

/// Zone callbacks, named after the notification they deliver.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ZoneCallback {
    /// A drag preview is about to be generated.
    GenerateDragPreview,
    /// A drag started.
    DragStart,
    /// The pointer moved during a drag.
    Drag,
    /// The resolved zones changed; fires for every zone in the previous or current stack.
    DropTargetChange,
    /// The zone became a drop target.
    DragEnter,
    /// The zone stopped being a drop target.
    DragLeave,
    /// The drag finished.
    Drop,
}

impl ZoneCallback {
    /// All callbacks, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::GenerateDragPreview,
        Self::DragStart,
        Self::Drag,
        Self::DropTargetChange,
        Self::DragEnter,
        Self::DragLeave,
        Self::Drop,
    ];

    /// Conventional handler name, for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::GenerateDragPreview => "onGenerateDragPreview",
            Self::DragStart => "onDragStart",
            Self::Drag => "onDrag",
            Self::DropTargetChange => "onDropTargetChange",
            Self::DragEnter => "onDragEnter",
            Self::DragLeave => "onDragLeave",
            Self::Drop => "onDrop",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl core::fmt::Display for ZoneCallback {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Arguments handed to zone callbacks.
#[derive(Clone, Copy, Debug)]
pub struct ZoneEventArgs<'a, K> {
    /// The drag.
    pub source: &'a DragPayload,
    /// Initial, previous, and current locations of the drag.
    pub location: &'a DragLocationHistory<K>,
    /// This zone's own record.
    pub self_record: &'a ResolvedRecord<K>,
}

/// A registered drop zone.
pub trait DropZone<K> {
    /// Whether the zone accepts the drag.
    fn can_accept(&self, _feedback: &Feedback<'_, K>) -> bool {
        true
    }

    /// Whether the zone stays active after hit testing stops reaching it.
    fn is_sticky(&self, _feedback: &Feedback<'_, K>) -> bool {
        false
    }

    /// Data attached to the zone's record.
    fn data(&self, _feedback: &Feedback<'_, K>) -> DataMap {
        DataMap::new()
    }

    /// The zone's drop effect; `None` uses the engine default.
    fn effect(&self, _feedback: &Feedback<'_, K>) -> Option<DropEffect> {
        None
    }

    /// See [`ZoneCallback::GenerateDragPreview`].
    fn on_generate_drag_preview(&mut self, _args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        Ok(())
    }

    /// See [`ZoneCallback::DragStart`].
    fn on_drag_start(&mut self, _args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        Ok(())
    }

    /// See [`ZoneCallback::Drag`].
    fn on_drag(&mut self, _args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        Ok(())
    }

    /// See [`ZoneCallback::DropTargetChange`].
    fn on_drop_target_change(&mut self, _args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        Ok(())
    }

    /// See [`ZoneCallback::DragEnter`].
    fn on_drag_enter(&mut self, _args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        Ok(())
    }

    /// See [`ZoneCallback::DragLeave`].
    fn on_drag_leave(&mut self, _args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        Ok(())
    }

    /// See [`ZoneCallback::Drop`].
    fn on_drop(&mut self, _args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        Ok(())
    }
}

/// Route `callback` to the matching [`DropZone`] method.
pub fn invoke<K>(
    zone: &mut dyn DropZone<K>,
    callback: ZoneCallback,
    args: &ZoneEventArgs<'_, K>,
) -> Result<(), ZoneError> {
    match callback {
        ZoneCallback::GenerateDragPreview => zone.on_generate_drag_preview(args),
        ZoneCallback::DragStart => zone.on_drag_start(args),
        ZoneCallback::Drag => zone.on_drag(args),
        ZoneCallback::DropTargetChange => zone.on_drop_target_change(args),
        ZoneCallback::DragEnter => zone.on_drag_enter(args),
        ZoneCallback::DragLeave => zone.on_drag_leave(args),
        ZoneCallback::Drop => zone.on_drop(args),
    }
}

/// Run a zone predicate, producer, or callback.
///
/// With the `std` feature a panic is caught and reported as `None`. Without it, panics
/// propagate.
#[cfg(feature = "std")]
pub(crate) fn catch_panic<T>(f: impl FnOnce() -> T) -> Option<T> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).ok()
}

#[cfg(not(feature = "std"))]
pub(crate) fn catch_panic<T>(f: impl FnOnce() -> T) -> Option<T> {
    Some(f())
}

type Predicate<K> = Box<dyn Fn(&Feedback<'_, K>) -> bool>;
type DataFn<K> = Box<dyn Fn(&Feedback<'_, K>) -> DataMap>;
type EffectFn<K> = Box<dyn Fn(&Feedback<'_, K>) -> Option<DropEffect>>;
type Handler<K> = Box<dyn FnMut(&ZoneEventArgs<'_, K>) -> Result<(), ZoneError>>;

/// A zone assembled from optional closures.
///
/// ```
/// use understory_drop::zone::{ZoneCallback, ZoneDescriptor};
/// use understory_drop::data::DataMap;
///
/// let zone: ZoneDescriptor<u32> = ZoneDescriptor::new()
///     .with_can_accept(|fb| fb.payload.type_tag == "card")
///     .with_sticky(|_| true)
///     .with_data(|fb| DataMap::new().with("zone", i64::from(fb.node)))
///     .on(ZoneCallback::DragEnter, |args| {
///         let _ = args.self_record.node;
///         Ok(())
///     });
/// # let _ = zone;
/// ```
pub struct ZoneDescriptor<K> {
    can_accept: Option<Predicate<K>>,
    is_sticky: Option<Predicate<K>>,
    data: Option<DataFn<K>>,
    effect: Option<EffectFn<K>>,
    handlers: [Option<Handler<K>>; 7],
}

impl<K> core::fmt::Debug for ZoneDescriptor<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let handlers = self.handlers.iter().filter(|h| h.is_some()).count();
        f.debug_struct("ZoneDescriptor")
            .field("can_accept", &self.can_accept.is_some())
            .field("is_sticky", &self.is_sticky.is_some())
            .field("data", &self.data.is_some())
            .field("effect", &self.effect.is_some())
            .field("handlers", &handlers)
            .finish()
    }
}

impl<K> Default for ZoneDescriptor<K> {
    fn default() -> Self {
        Self {
            can_accept: None,
            is_sticky: None,
            data: None,
            effect: None,
            handlers: core::array::from_fn(|_| None),
        }
    }
}

impl<K> ZoneDescriptor<K> {
    /// A zone with no predicates, producers, or callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the acceptance predicate.
    #[must_use]
    pub fn with_can_accept(mut self, f: impl Fn(&Feedback<'_, K>) -> bool + 'static) -> Self {
        self.can_accept = Some(Box::new(f));
        self
    }

    /// Set the stickiness predicate.
    #[must_use]
    pub fn with_sticky(mut self, f: impl Fn(&Feedback<'_, K>) -> bool + 'static) -> Self {
        self.is_sticky = Some(Box::new(f));
        self
    }

    /// Set the data producer.
    #[must_use]
    pub fn with_data(mut self, f: impl Fn(&Feedback<'_, K>) -> DataMap + 'static) -> Self {
        self.data = Some(Box::new(f));
        self
    }

    /// Set the effect producer.
    #[must_use]
    pub fn with_effect(
        mut self,
        f: impl Fn(&Feedback<'_, K>) -> Option<DropEffect> + 'static,
    ) -> Self {
        self.effect = Some(Box::new(f));
        self
    }

    /// Set the handler for `callback`, replacing any previous one.
    #[must_use]
    pub fn on(
        mut self,
        callback: ZoneCallback,
        f: impl FnMut(&ZoneEventArgs<'_, K>) -> Result<(), ZoneError> + 'static,
    ) -> Self {
        self.handlers[callback.slot()] = Some(Box::new(f));
        self
    }

    fn call(
        &mut self,
        callback: ZoneCallback,
        args: &ZoneEventArgs<'_, K>,
    ) -> Result<(), ZoneError> {
        match self.handlers[callback.slot()].as_mut() {
            Some(h) => h(args),
            None => Ok(()),
        }
    }
}

impl<K> DropZone<K> for ZoneDescriptor<K> {
    fn can_accept(&self, feedback: &Feedback<'_, K>) -> bool {
        self.can_accept.as_ref().is_none_or(|f| f(feedback))
    }

    fn is_sticky(&self, feedback: &Feedback<'_, K>) -> bool {
        self.is_sticky.as_ref().is_some_and(|f| f(feedback))
    }

    fn data(&self, feedback: &Feedback<'_, K>) -> DataMap {
        self.data.as_ref().map(|f| f(feedback)).unwrap_or_default()
    }

    fn effect(&self, feedback: &Feedback<'_, K>) -> Option<DropEffect> {
        self.effect.as_ref().and_then(|f| f(feedback))
    }

    fn on_generate_drag_preview(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.call(ZoneCallback::GenerateDragPreview, args)
    }

    fn on_drag_start(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.call(ZoneCallback::DragStart, args)
    }

    fn on_drag(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.call(ZoneCallback::Drag, args)
    }

    fn on_drop_target_change(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.call(ZoneCallback::DropTargetChange, args)
    }

    fn on_drag_enter(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.call(ZoneCallback::DragEnter, args)
    }

    fn on_drag_leave(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.call(ZoneCallback::DragLeave, args)
    }

    fn on_drop(&mut self, args: &ZoneEventArgs<'_, K>) -> Result<(), ZoneError> {
        self.call(ZoneCallback::Drop, args)
    }
}
