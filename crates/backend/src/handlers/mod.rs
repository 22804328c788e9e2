// Usecase handlers (u501)
pub mod usecases;
