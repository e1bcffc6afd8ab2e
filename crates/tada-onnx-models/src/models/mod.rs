pub mod tada;
