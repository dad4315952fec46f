pub mod excursion;
