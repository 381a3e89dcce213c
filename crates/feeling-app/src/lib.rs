// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod backend;
pub mod crud;
pub mod debounce;
pub mod forms;
pub mod model;
pub mod page;
pub mod pages;
pub mod resolver;
pub mod table;
pub mod tabs;
pub mod view;

pub use backend::*;
pub use crud::*;
pub use debounce::*;
pub use forms::*;
pub use model::*;
pub use page::*;
pub use resolver::*;
pub use table::*;
pub use tabs::*;
pub use view::*;
