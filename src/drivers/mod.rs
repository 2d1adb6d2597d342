pub mod elantech;
