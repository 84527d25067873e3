use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// The chain builder reached an operation kind the splittability check
    /// never admits. The two walk the same grammar, so this is a programming
    /// defect and aborts the rewrite rather than producing a wrong graph.
    #[snafu(display("split builder reached unsupported operation '{op}' at node {node}"))]
    UnsupportedChainNode { op: &'static str, node: usize },

    /// Error raised by the IR substrate while editing the graph.
    #[snafu(transparent)]
    Ir { source: tessel_ir::Error },
}
