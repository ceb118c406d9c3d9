mod classification;
mod concurrency;
mod filtering;
mod fixtures;
mod resolution;
