mod blog_test;
