mod session_feed_test;
