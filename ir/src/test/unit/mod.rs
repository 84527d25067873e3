mod eval;
mod shape;
