mod tests_overwrite;
