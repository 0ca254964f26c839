mod facade;
mod store;
