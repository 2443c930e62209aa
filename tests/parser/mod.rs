mod tests_python_ast;
