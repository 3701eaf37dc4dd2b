pub mod pangenome;
