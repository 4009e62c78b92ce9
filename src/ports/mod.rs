/// Ports layer: interface definitions decoupling the engine from
/// infrastructure. The traversal visitor callback lives with the engine
/// itself (it is the engine's own contract with callers); everything the
/// engine *consumes* is declared here.
pub mod outbound;
