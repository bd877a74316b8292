//! Workspace root package. It carries no code and exists so `rusty-hook`
//! installs the pre-commit hooks declared in the root manifest.
