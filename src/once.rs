/*
Copyright 2020 Google LLC

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    https://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use once_cell::sync::OnceCell;

/// Runs an initializer at most once and caches its result.
#[doc(hidden)]
pub struct Once<T> {
    cell: OnceCell<T>,
}

impl<T> Once<T> {
    pub fn new() -> Self {
        Once {
            cell: OnceCell::new(),
        }
    }

    pub fn get<F>(&self, initializer: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(initializer)
    }
}

impl<T> Default for Once<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn initializer_runs_exactly_once() {
        let calls = Cell::new(0);
        let once = Once::new();
        let a = once.get(|| {
            calls.set(calls.get() + 1);
            42
        });
        let b = once.get(|| {
            calls.set(calls.get() + 1);
            99
        });
        assert_eq!(*a, 42);
        assert_eq!(*b, 42);
        assert_eq!(calls.get(), 1);
    }
}
