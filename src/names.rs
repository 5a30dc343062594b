// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Ordered sets of variable names.

use std::ops::Deref;

use crate::error::{dimension_mismatch, DistributionError};
use crate::indexing::permutation_between;

/// An ordered sequence of unique variable names.
///
/// The position of a name is the axis of the variable it identifies, so the
/// length of the set is the dimension of the distribution that owns it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VariableNames
{
    names: Vec<String>,
}

impl VariableNames
{
    /// Create a name set, failing with `DuplicateVariable` on repeated names.
    pub fn new<I, S>(names: I) -> Result<Self, DistributionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if let Some(dup) = first_duplicate(&names) {
            return Err(DistributionError::DuplicateVariable(dup.clone()));
        }
        Ok(VariableNames { names })
    }

    /// Names `"0"`, `"1"`, ... for `dim` anonymous variables.
    pub fn numbered(dim: usize) -> Self
    {
        Self::with_prefix("", dim)
    }

    pub(crate) fn with_prefix(prefix: &str, dim: usize) -> Self
    {
        VariableNames {
            names: (0..dim).map(|i| format!("{}{}", prefix, i)).collect(),
        }
    }

    /// Number of names.
    #[inline]
    pub fn len(&self) -> usize
    {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool
    {
        self.names.is_empty()
    }

    /// Axis of `name`, if present.
    pub fn position(&self, name: &str) -> Option<usize>
    {
        self.names.iter().position(|n| n == name)
    }

    /// Axis of `name`, or `VariableNotFound`.
    pub fn axis_of(&self, name: &str) -> Result<usize, DistributionError>
    {
        self.position(name)
            .ok_or_else(|| DistributionError::VariableNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool
    {
        self.position(name).is_some()
    }

    /// A copy of the set with the name at `axis` removed.
    ///
    /// **Panics** if `axis` is out of bounds.
    pub fn remove_axis(&self, axis: usize) -> Self
    {
        let mut names = self.names.clone();
        names.remove(axis);
        VariableNames { names }
    }

    /// The permutation that rearranges this set into `requested`.
    ///
    /// **Errors** if `requested` repeats a name, names a variable that is not
    /// held, or leaves a held variable out.
    pub fn permutation_to(&self, requested: &[String]) -> Result<Vec<usize>, DistributionError>
    {
        let requested = VariableNames::new(requested.iter().cloned())?;
        if let Some(missing) = requested.iter().find(|name| !self.contains(name)) {
            return Err(DistributionError::VariableNotFound(missing.clone()));
        }
        permutation_between(self.as_slice(), requested.as_slice())
            .ok_or_else(|| dimension_mismatch(&[self.len()], &[requested.len()]))
    }

    /// The set with its names rearranged by `perm`, where axis `i` of the
    /// result is axis `perm[i]` of `self`.
    pub(crate) fn permuted(&self, perm: &[usize]) -> Self
    {
        VariableNames {
            names: perm.iter().map(|&i| self.names[i].clone()).collect(),
        }
    }

    pub fn as_slice(&self) -> &[String]
    {
        &self.names
    }

    pub fn into_vec(self) -> Vec<String>
    {
        self.names
    }
}

impl Deref for VariableNames
{
    type Target = [String];

    fn deref(&self) -> &[String]
    {
        &self.names
    }
}

fn first_duplicate(names: &[String]) -> Option<&String>
{
    names
        .iter()
        .enumerate()
        .find(|&(i, name)| names[..i].contains(name))
        .map(|(_, name)| name)
}
