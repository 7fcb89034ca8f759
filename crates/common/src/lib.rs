//! Graph file formats shared by the binaries of the workspace.

pub mod io;
