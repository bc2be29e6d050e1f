mod access;
mod utils;
