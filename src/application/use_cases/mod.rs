mod subgraph_queries;

pub use subgraph_queries::SubgraphQueryUseCase;
