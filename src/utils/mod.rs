pub mod chrom;
