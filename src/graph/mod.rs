pub mod debt_matrix;
