//! Lifetime-carrying, type-erased object addresses.
//!
//! The reflection layer stores objects behind erased addresses so that a
//! single property binding can operate on any object that embeds the
//! declaring type. Raw pointers would work, but they lose the lifetime of
//! the borrow they were made from. The wrappers here keep it.
//!
//! **Address** and **AddressMut**
//!
//! [`Address<'a>`] and [`AddressMut<'a>`] are type-erased `&T` and `&mut T`
//! equivalents. They can be shifted by a byte offset, which is how a
//! derived object's address is turned into the address of an embedded
//! base object and back again.
#![expect(unsafe_code, reason = "Erased addresses are raw pointers underneath.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod address;

// -----------------------------------------------------------------------------
// Top-level exports

pub use address::{Address, AddressMut};
